//! Federal tax lien table reconstruction.
//!
//! The table has no ruling lines OCR could pick up, so it is rebuilt from
//! geometry: the "Kind of Tax" header gives a horizontal band, the band is
//! walked downwards to find row anchors, and each anchor's vertical span
//! collects the rest of its row.

use std::collections::HashSet;

use tracing::debug;

use super::{LabelMatch, LabelMatcher};
use crate::models::{ExtractionConfig, TableRow, TaxLienTable, TAX_LIEN_COLUMNS};
use crate::words::{Line, Word, WordView};

/// Fragments of the table title, "Notice of Federal Tax Lien".
const TABLE_ANCHOR: (&str, &str) = ("Notice", "Lien");

/// Fragments of the first column header, "Kind of Tax".
const FIRST_COLUMN: (&str, &str) = ("Kind", "Tax");

/// Horizontal band of the first column plus the header's vertical extent.
#[derive(Debug, Clone, Copy)]
struct ColumnBand {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl ColumnBand {
    fn contains_x(&self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Extracts tax lien tables from a view.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    matcher: LabelMatcher,
    row_height: f64,
    band_left: f64,
    band_right: f64,
    cell_gap: f64,
    min_rows: usize,
}

impl TableExtractor {
    pub fn new(matcher: LabelMatcher, config: &ExtractionConfig) -> Self {
        Self {
            matcher,
            row_height: config.row_height,
            band_left: config.band_left,
            band_right: config.band_right,
            cell_gap: config.cell_gap,
            min_rows: config.min_table_rows,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(LabelMatcher::from_config(config), config)
    }

    /// Every table instance in the view; each surviving title anchor is one
    /// candidate table.
    pub fn extract(&self, view: &WordView<'_>) -> Vec<TaxLienTable> {
        let anchors = self.matcher.candidates(view, TABLE_ANCHOR.0, TABLE_ANCHOR.1);
        debug!("Found {} tax lien table anchors", anchors.len());

        let mut seen_headers = HashSet::new();
        let mut tables = Vec::new();

        for anchor in &anchors {
            let page_idx = anchor.line.page_idx;
            let page = view.page(page_idx);
            let headers = self.matcher.candidates(&page, FIRST_COLUMN.0, FIRST_COLUMN.1);

            let Some(header) = column_header(&headers, anchor) else {
                debug!("No column header for table anchor on page {}", page_idx);
                continue;
            };
            if !seen_headers.insert(header.line) {
                continue;
            }

            let band = self.band(&header);
            let limit = next_table_top(&band, &anchors, &headers, page_idx);
            let mut rows = vec![TableRow(
                TAX_LIEN_COLUMNS.iter().map(|c| Some(c.to_string())).collect(),
            )];
            rows.extend(
                self.row_anchors(&page, &band, limit)
                    .iter()
                    .map(|line| self.row_cells(&page, &band, line)),
            );

            if rows.len() < self.min_rows {
                debug!(
                    "Discarding tax lien table on page {} with {} rows",
                    page_idx,
                    rows.len()
                );
                continue;
            }

            tables.push(TaxLienTable { page_idx, rows });
        }

        tables
    }

    fn band(&self, header: &LabelMatch<'_>) -> ColumnBand {
        let (x1, y1, x2, y2) = header.bbox();
        ColumnBand {
            left: x1 - self.band_left,
            right: x2 + self.band_right,
            top: y1,
            bottom: y2,
        }
    }

    /// First-column cells between the header and `limit`, top to bottom.
    ///
    /// The walk stops at the first line lying more than the row height below
    /// the header, or more than the row height below the previous line.
    fn row_anchors<'a>(&self, page: &WordView<'a>, band: &ColumnBand, limit: f64) -> Vec<Line<'a>> {
        let column = page.filter(|w| {
            band.contains_x(w.x1) && w.center_y() > band.bottom && w.center_y() < limit
        });

        let mut lines = column.lines();
        lines.sort_by(|a, b| {
            let gap_a = a.bbox().1 - band.top;
            let gap_b = b.bbox().1 - band.top;
            gap_a.total_cmp(&gap_b).then(a.key.cmp(&b.key))
        });

        lines
            .into_iter()
            .scan(0.0_f64, |previous_gap, line| {
                let top = line.bbox().1;
                let gap = top - band.top;
                if top - band.bottom > self.row_height || gap - *previous_gap > self.row_height {
                    return None;
                }
                *previous_gap = gap;
                Some(line)
            })
            .collect()
    }

    /// Words sharing the anchor's vertical span, split into cells at wide
    /// horizontal gaps.
    fn row_cells(&self, page: &WordView<'_>, band: &ColumnBand, anchor: &Line<'_>) -> TableRow {
        let (_, top, _, bottom) = anchor.bbox();

        let mut words: Vec<&Word> = page
            .iter()
            .filter(|w| w.x1 >= band.left && (top..=bottom).contains(&w.center_y()))
            .collect();
        words.sort_by(|a, b| a.x1.total_cmp(&b.x1));

        let mut cells: Vec<Vec<&Word>> = Vec::new();
        for word in words {
            match cells.last_mut() {
                Some(cell)
                    if cell
                        .last()
                        .is_some_and(|prev| word.x1 - prev.x2 <= self.cell_gap) =>
                {
                    cell.push(word)
                }
                _ => cells.push(vec![word]),
            }
        }

        let texts = cells
            .iter()
            .map(|cell| {
                cell.iter()
                    .map(|w| w.value.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        TableRow(fit_columns(texts, TAX_LIEN_COLUMNS.len()))
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

/// Header cell of the first column nearest below the anchor, or the best
/// ranked one when none lies below it.
fn column_header<'a>(headers: &[LabelMatch<'a>], anchor: &LabelMatch<'a>) -> Option<LabelMatch<'a>> {
    let (_, anchor_top, _, _) = anchor.bbox();

    headers
        .iter()
        .filter(|c| c.bbox().1 >= anchor_top)
        .min_by(|a, b| a.bbox().1.total_cmp(&b.bbox().1))
        .or_else(|| headers.first())
        .cloned()
}

/// Top of the next table title or column header below `band` on the page;
/// a table never extends past it.
fn next_table_top<'a>(
    band: &ColumnBand,
    anchors: &[LabelMatch<'a>],
    headers: &[LabelMatch<'a>],
    page_idx: usize,
) -> f64 {
    anchors
        .iter()
        .filter(|a| a.line.page_idx == page_idx)
        .chain(headers)
        .map(|m| m.bbox().1)
        .filter(|top| *top > band.bottom)
        .fold(f64::INFINITY, f64::min)
}

/// Pad with nulls, or merge the overflow into the last column.
fn fit_columns(mut cells: Vec<String>, columns: usize) -> Vec<Option<String>> {
    if columns > 0 && cells.len() > columns {
        let overflow = cells.split_off(columns - 1);
        cells.push(overflow.join(" "));
    }

    cells
        .into_iter()
        .map(Some)
        .chain(std::iter::repeat(None))
        .take(columns)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PageBuilder;
    use pretty_assertions::assert_eq;

    const COLUMN_X: [f64; 6] = [0.05, 0.20, 0.36, 0.52, 0.68, 0.86];

    fn header(builder: PageBuilder, y: f64) -> PageBuilder {
        TAX_LIEN_COLUMNS
            .iter()
            .zip(COLUMN_X)
            .fold(builder, |b, (name, x)| b.text(name, x, y))
    }

    fn row(builder: PageBuilder, cells: &[&str], y: f64) -> PageBuilder {
        cells
            .iter()
            .zip(COLUMN_X)
            .fold(builder.next_line(), |b, (cell, x)| b.text(cell, x, y))
    }

    fn lien_table_page() -> PageBuilder {
        let builder = PageBuilder::new()
            .text("Notice of Federal Tax Lien", 0.30, 0.10)
            .next_block();
        let builder = header(builder, 0.30);
        let builder = row(
            builder,
            &["Form 941", "12/31/2018", "XX-XXX1234", "03/04/2019", "04/03/2029", "$10,000.00"],
            0.33,
        );
        let builder = row(
            builder,
            &["940", "12/31/2019", "XX-XXX1234", "03/02/2020", "04/01/2030", "$2,500.00"],
            0.36,
        );
        row(
            builder.next_block(),
            &["Signature", "of", "Revenue", "Officer"],
            0.60,
        )
    }

    #[test]
    fn test_walk_stops_at_large_gap() {
        let table = lien_table_page().build();
        let config = ExtractionConfig {
            row_height: 0.05,
            ..Default::default()
        };

        let tables = TableExtractor::from_config(&config).extract(&table.view());
        assert_eq!(tables.len(), 1);

        let lien_table = &tables[0];
        assert_eq!(lien_table.page_idx, 0);
        assert_eq!(lien_table.data_rows().len(), 2);
        assert_eq!(
            lien_table.header().unwrap().cells()[0].as_deref(),
            Some("Kind of Tax")
        );
        assert_eq!(
            lien_table.data_rows()[0],
            TableRow(vec![
                Some("Form 941".to_string()),
                Some("12/31/2018".to_string()),
                Some("XX-XXX1234".to_string()),
                Some("03/04/2019".to_string()),
                Some("04/03/2029".to_string()),
                Some("$10,000.00".to_string()),
            ])
        );
        assert_eq!(lien_table.data_rows()[1].cell(0), Some("940"));
        assert_eq!(lien_table.data_rows()[1].cell(5), Some("$2,500.00"));
    }

    #[test]
    fn test_default_row_height() {
        let table = lien_table_page().build();
        let tables = TableExtractor::default().extract(&table.view());

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 3);
    }

    #[test]
    fn test_table_without_rows_is_discarded() {
        let builder = PageBuilder::new()
            .text("Notice of Federal Tax Lien", 0.30, 0.10)
            .next_block();
        let table = header(builder, 0.30).build();

        assert!(TableExtractor::default().extract(&table.view()).is_empty());
    }

    #[test]
    fn test_no_anchor_no_table() {
        let builder = PageBuilder::new();
        let table = row(header(builder, 0.30), &["941"], 0.33).build();

        assert!(TableExtractor::default().extract(&table.view()).is_empty());
    }

    #[test]
    fn test_short_row_is_padded() {
        let builder = PageBuilder::new()
            .text("Notice of Federal Tax Lien", 0.30, 0.10)
            .next_block();
        let table = row(header(builder, 0.30), &["1040", "12/31/2020"], 0.33).build();

        let tables = TableExtractor::default().extract(&table.view());
        let data = &tables[0].data_rows()[0];
        assert_eq!(data.cells().len(), 6);
        assert_eq!(data.cell(1), Some("12/31/2020"));
        assert_eq!(data.cell(2), None);
    }

    #[test]
    fn test_tables_on_separate_pages() {
        let first = lien_table_page().next_page();
        let second = header(
            first.text("Notice of Federal Tax Lien", 0.30, 0.10).next_block(),
            0.20,
        );
        let table = row(second, &["720", "06/30/2021"], 0.23).build();

        let tables = TableExtractor::default().extract(&table.view());
        assert_eq!(tables.len(), 2);

        let pages: Vec<usize> = tables.iter().map(|t| t.page_idx).collect();
        assert!(pages.contains(&0) && pages.contains(&1));
    }

    #[test]
    fn test_walk_is_bounded_below_header() {
        let builder = PageBuilder::new()
            .text("Notice of Federal Tax Lien", 0.30, 0.10)
            .next_block();
        let table = (1..=10)
            .fold(header(builder, 0.30), |b, i| {
                row(b, &["941"], 0.30 + 0.04 * i as f64)
            })
            .build();
        let config = ExtractionConfig {
            row_height: 0.05,
            ..Default::default()
        };

        let tables = TableExtractor::from_config(&config).extract(&table.view());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].data_rows().len(), 1);
    }

    #[test]
    fn test_two_tables_on_one_page() {
        let builder = PageBuilder::new()
            .text("Notice of Federal Tax Lien", 0.30, 0.10)
            .next_block();
        let builder = row(header(builder, 0.20), &["941", "12/31/2018"], 0.23);
        let builder = builder
            .next_block()
            .text("Notice of Federal Tax Lien", 0.30, 0.35)
            .next_block();
        let table = row(header(builder, 0.40), &["720", "06/30/2021"], 0.43).build();

        let mut tables = TableExtractor::default().extract(&table.view());
        tables.sort_by_key(|t| t.data_rows()[0].cell(0).map(str::to_string));
        assert_eq!(tables.len(), 2);

        let first_cells: Vec<Vec<Option<&str>>> = tables
            .iter()
            .map(|t| t.data_rows().iter().map(|r| r.cell(0)).collect())
            .collect();
        assert_eq!(first_cells, vec![vec![Some("720")], vec![Some("941")]]);
    }

    #[test]
    fn test_nearest_header_below_anchor_wins() {
        let builder = header(PageBuilder::new(), 0.05);
        let builder = row(builder, &["1040"], 0.08)
            .next_block()
            .text("Notice of Federal Tax Lien", 0.30, 0.20)
            .next_block();
        let table = row(header(builder, 0.30), &["941"], 0.33).build();

        let tables = TableExtractor::default().extract(&table.view());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].data_rows().len(), 1);
        assert_eq!(tables[0].data_rows()[0].cell(0), Some("941"));
    }

    #[test]
    fn test_anchors_sharing_a_header_give_one_table() {
        let builder = PageBuilder::new()
            .text("Notice of Federal Tax Lien", 0.30, 0.10)
            .next_block()
            .text("Notice of Federal Tax Lien", 0.30, 0.15)
            .next_block();
        let table = row(header(builder, 0.30), &["941"], 0.33).build();

        let tables = TableExtractor::default().extract(&table.view());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].data_rows().len(), 1);
    }

    #[test]
    fn test_fit_columns() {
        let cells = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            fit_columns(cells(&["a", "b", "c", "d"]), 3),
            vec![Some("a".to_string()), Some("b".to_string()), Some("c d".to_string())]
        );
        assert_eq!(
            fit_columns(cells(&["a"]), 3),
            vec![Some("a".to_string()), None, None]
        );
    }
}
