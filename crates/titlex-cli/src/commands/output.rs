//! Report formatting.

use titlex_core::models::{FieldRecord, TitleReport, TAX_LIEN_COLUMNS};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one value per row
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_report(report: &TitleReport, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &TitleReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["section", "index", "field", "value"])?;

    for (name, value) in report.fields.iter() {
        wtr.write_record(["fields", "", name, value.unwrap_or_default()])?;
    }

    for (i, id) in report.parcel_ids.iter().enumerate() {
        wtr.write_record(["parcel_ids", &i.to_string(), "Parcel ID", id])?;
    }

    let sections: [(&str, &[FieldRecord]); 3] = [
        ("liens", &report.liens),
        ("vesting_instruments", &report.vesting_instruments),
        ("conveyance_instruments", &report.conveyance_instruments),
    ];
    for (section, records) in sections {
        for (i, record) in records.iter().enumerate() {
            for (name, value) in record.iter() {
                wtr.write_record([section, &i.to_string(), name, value.unwrap_or_default()])?;
            }
        }
    }

    for (t, table) in report.tax_lien_tables.iter().enumerate() {
        for (r, row) in table.data_rows().iter().enumerate() {
            let index = format!("{t}.{r}");
            for (column, cell) in TAX_LIEN_COLUMNS.iter().zip(row.cells()) {
                wtr.write_record([
                    "tax_lien_tables",
                    &index,
                    column,
                    cell.as_deref().unwrap_or_default(),
                ])?;
            }
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &TitleReport) -> String {
    let mut output = String::new();

    for (name, value) in report.fields.iter() {
        output.push_str(&format!("{}: {}\n", name, value.unwrap_or("-")));
    }
    if !report.parcel_ids.is_empty() {
        output.push_str(&format!("Parcel IDs: {}\n", report.parcel_ids.join(", ")));
    }

    push_records(&mut output, "Lien", &report.liens);
    push_records(&mut output, "Vesting Instrument", &report.vesting_instruments);
    push_records(&mut output, "Conveyance Instrument", &report.conveyance_instruments);

    for (i, table) in report.tax_lien_tables.iter().enumerate() {
        output.push_str(&format!(
            "\nFederal Tax Lien table {} (page {}):\n",
            i + 1,
            table.page_idx + 1
        ));
        for row in &table.rows {
            let cells: Vec<&str> = row
                .cells()
                .iter()
                .map(|c| c.as_deref().unwrap_or("-"))
                .collect();
            output.push_str(&format!("  {}\n", cells.join(" | ")));
        }
    }

    output
}

fn push_records(output: &mut String, title: &str, records: &[FieldRecord]) {
    for (i, record) in records.iter().enumerate() {
        output.push_str(&format!("\n{} {}:\n", title, i + 1));
        for (name, value) in record.iter() {
            if let Some(value) = value {
                output.push_str(&format!("  {}: {}\n", name, value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use titlex_core::models::{TableRow, TaxLienTable};

    fn report() -> TitleReport {
        let mut fields = FieldRecord::new();
        fields.insert("County", Some("Duval".to_string()));
        fields.insert("Owner", None);

        let mut lien = FieldRecord::new();
        lien.insert("Lien Type", Some("Mortgage".to_string()));
        lien.insert("Comment", None);

        TitleReport {
            fields,
            parcel_ids: vec!["012345-0000".to_string()],
            liens: vec![lien],
            tax_lien_tables: vec![TaxLienTable {
                page_idx: 0,
                rows: vec![
                    TableRow(TAX_LIEN_COLUMNS.iter().map(|c| Some(c.to_string())).collect()),
                    TableRow(vec![Some("941".to_string()), None]),
                ],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_has_one_row_per_value() {
        let csv = format_report(&report(), OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "section,index,field,value");
        assert!(lines.contains(&"fields,,County,Duval"));
        assert!(lines.contains(&"fields,,Owner,"));
        assert!(lines.contains(&"parcel_ids,0,Parcel ID,012345-0000"));
        assert!(lines.contains(&"liens,0,Lien Type,Mortgage"));
        assert!(lines.contains(&"tax_lien_tables,0.0,Kind of Tax,941"));
        assert!(lines.contains(&"tax_lien_tables,0.0,Tax Period Ending,"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_report(&report(), OutputFormat::Text, false).unwrap();

        assert!(text.contains("County: Duval\n"));
        assert!(text.contains("Owner: -\n"));
        assert!(text.contains("Lien 1:\n  Lien Type: Mortgage\n"));
        assert!(!text.contains("Comment"));
        assert!(text.contains("941 | -"));
    }

    #[test]
    fn test_json_keeps_nulls() {
        let json = format_report(&report(), OutputFormat::Json, false).unwrap();
        assert!(json.contains(r#""Owner":null"#));
        assert!(json.contains(r#""Comment":null"#));
    }
}
