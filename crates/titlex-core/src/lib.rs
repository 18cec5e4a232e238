//! Core library for title report OCR field extraction.
//!
//! This crate provides:
//! - OCR export model (pages, blocks, lines, words with normalized boxes)
//! - Flattening of an export into a word table
//! - Approximate label matching with spatial tie-breaking
//! - Extraction of header fields, repeating records and tax lien tables

pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod words;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ConfigError, ExportError, Result, TitlexError};
pub use extract::{
    ExtractionResult, FieldSpec, Label, LabelMatcher, LineExtractor, RecordGroupExtractor,
    RecordKind, ReportExtractor, TableExtractor,
};
pub use models::{ExtractionConfig, FieldRecord, TableRow, TaxLienTable, TitleReport, TitlexConfig};
pub use ocr::OcrExport;
pub use words::{BlockKey, Line, LineKey, Word, WordTable, WordView};

/// Flatten an export and extract a report from it.
///
/// Fails only when the export is structurally malformed; missing fields end
/// up as nulls and warnings in the result.
pub fn extract_from_export(export: &OcrExport, config: &ExtractionConfig) -> Result<ExtractionResult> {
    let table = WordTable::from_export(export)?;
    Ok(ReportExtractor::from_config(config).extract(&table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_from_export() {
        let export = OcrExport::from_json(
            r#"{"pages": [{"blocks": [{"lines": [{"words": [
                {"value": "County:", "geometry": [[0.10, 0.10], [0.16, 0.12]]},
                {"value": "Duval", "geometry": [[0.17, 0.10], [0.21, 0.12]]}
            ]}]}]}]}"#,
        )
        .unwrap();

        let result = extract_from_export(&export, &ExtractionConfig::default()).unwrap();
        assert_eq!(result.report.fields.get("County"), Some("Duval"));
        assert_eq!(result.word_count, 2);
        assert_eq!(result.page_count, 1);
    }

    #[test]
    fn test_extract_from_export_rejects_missing_level() {
        let export = OcrExport::from_json(r#"{"pages": [{"page_idx": 0}]}"#).unwrap();

        let err = extract_from_export(&export, &ExtractionConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            TitlexError::Export(ExportError::MissingLevel { level: "blocks", .. })
        ));
    }
}
