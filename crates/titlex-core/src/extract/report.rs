//! Whole-report extraction.

use std::time::Instant;

use tracing::{debug, info};

use super::{
    extract_value, FieldSpec, LabelMatcher, LineExtractor, RecordGroupExtractor, RecordKind,
    TableExtractor,
};
use crate::models::{ExtractionConfig, TitleReport};
use crate::words::WordTable;

/// Flat header fields of a title report.
pub const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::two("Company Name", "Company", "Name:"),
    FieldSpec::two("Order Number", "Order", "Number:"),
    FieldSpec::two("Effective Date", "Effective", "Date:"),
    FieldSpec::one("County", "County:"),
    FieldSpec::two("Property Address", "Property", "Address:"),
    FieldSpec::one("Owner", "Owner:"),
    FieldSpec::two("Legal Description", "Legal", "Description:"),
];

/// Label of the parcel identifier lines; every occurrence is collected.
pub const PARCEL_ID_LABEL: (&str, &str) = ("Parcel", "ID:");

/// Result of a report extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted report.
    pub report: TitleReport,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Number of words in the table.
    pub word_count: usize,
    /// Number of pages in the table.
    pub page_count: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs every extractor over a word table.
#[derive(Debug, Clone)]
pub struct ReportExtractor {
    lines: LineExtractor,
    records: RecordGroupExtractor,
    tables: TableExtractor,
}

impl ReportExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        let matcher = LabelMatcher::from_config(config);
        let lines = LineExtractor::new(matcher.clone());
        Self {
            records: RecordGroupExtractor::new(lines.clone()),
            tables: TableExtractor::new(matcher, config),
            lines,
        }
    }

    pub fn extract(&self, table: &WordTable) -> ExtractionResult {
        let start = Instant::now();
        let view = table.view();
        let mut warnings = Vec::new();

        info!(
            "Extracting report from {} words on {} pages",
            table.len(),
            table.page_count()
        );

        let fields = self.lines.record(&view, HEADER_FIELDS);
        for name in fields.missing() {
            warnings.push(format!("Could not extract {name}"));
        }

        let parcel_ids = self.parcel_ids(table);
        if parcel_ids.is_empty() {
            warnings.push("Could not extract parcel IDs".to_string());
        }

        let liens = self.records.extract(&view, RecordKind::Lien);
        let vesting_instruments = self.records.extract(&view, RecordKind::VestingInstrument);
        let conveyance_instruments = self.records.extract(&view, RecordKind::ConveyanceInstrument);
        let tax_lien_tables = self.tables.extract(&view);

        debug!(
            "Extracted {} liens, {} vesting, {} conveyance instruments, {} tax lien tables",
            liens.len(),
            vesting_instruments.len(),
            conveyance_instruments.len(),
            tax_lien_tables.len()
        );

        ExtractionResult {
            report: TitleReport {
                fields,
                parcel_ids,
                liens,
                vesting_instruments,
                conveyance_instruments,
                tax_lien_tables,
            },
            warnings,
            word_count: table.len(),
            page_count: table.page_count(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Values of every parcel ID line, deduplicated in rank order.
    fn parcel_ids(&self, table: &WordTable) -> Vec<String> {
        let view = table.view();
        let mut ids: Vec<String> = Vec::new();

        for candidate in self
            .lines
            .matcher()
            .candidates(&view, PARCEL_ID_LABEL.0, PARCEL_ID_LABEL.1)
        {
            let value = view
                .line(candidate.line)
                .and_then(|line| extract_value(&line.text()));
            if let Some(value) = value {
                if !ids.contains(&value) {
                    ids.push(value);
                }
            }
        }

        ids
    }
}

impl Default for ReportExtractor {
    fn default() -> Self {
        Self::new()
    }
}
