//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Main configuration for titlex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlexConfig {
    /// External OCR collaborator.
    pub ocr: OcrConfig,

    /// Field and table extraction tuning.
    pub extraction: ExtractionConfig,
}

/// How to obtain a fresh OCR export for a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Program that prints an OCR export as JSON on stdout.
    pub program: Option<String>,

    /// Arguments; `{input}` is replaced by the document path.
    pub args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: vec!["{input}".to_string()],
        }
    }
}

impl OcrConfig {
    /// Arguments with the `{input}` placeholder substituted.
    pub fn resolved_args(&self, input: &Path) -> Vec<String> {
        let input = input.display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input))
            .collect()
    }
}

/// Tuning for label matching and table reconstruction.
///
/// The defaults were tuned on one family of title report layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Two-fragment candidates must score strictly below this distance
    /// (0 = identical, 100 = nothing in common).
    pub max_distance: f64,

    /// Maximum vertical step, in page units, between a table header and its
    /// first row or between consecutive rows.
    pub row_height: f64,

    /// Padding left of a column header when building its band.
    pub band_left: f64,

    /// Padding right of a column header when building its band.
    pub band_right: f64,

    /// Horizontal gap that separates two cells of a table row.
    pub cell_gap: f64,

    /// Tables with fewer rows (header included) are dropped.
    pub min_table_rows: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_distance: 10.0,
            row_height: 0.21,
            band_left: 0.01,
            band_right: 0.01,
            cell_gap: 0.02,
            min_table_rows: 2,
        }
    }
}

impl TitlexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Access {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Access {
            path: path.display().to_string(),
            source,
        })
    }
}
