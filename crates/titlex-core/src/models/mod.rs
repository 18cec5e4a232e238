//! Configuration and output data models.

pub mod config;
pub mod report;

pub use config::{ExtractionConfig, OcrConfig, TitlexConfig};
pub use report::{FieldRecord, TableRow, TaxLienTable, TitleReport, TAX_LIEN_COLUMNS};
