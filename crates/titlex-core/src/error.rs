//! Error types for the titlex-core library.
//!
//! Only structural problems abort an extraction. A label that cannot be
//! found is an ordinary outcome and surfaces as `None`, never as an error.

use thiserror::Error;

/// Main error type for the titlex library.
#[derive(Error, Debug)]
pub enum TitlexError {
    /// The OCR export cannot be flattened.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration file problem.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural problems in an OCR export.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// A nesting level (`pages`, `blocks`, `lines`, `words`) is absent.
    #[error("missing `{level}` at {path}")]
    MissingLevel { level: &'static str, path: String },

    /// The export contains no pages at all.
    #[error("export has no pages")]
    NoPages,
}

/// Errors related to configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    #[error("cannot access {path}: {source}")]
    Access {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid configuration.
    #[error("invalid configuration in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// Result type for the titlex library.
pub type Result<T> = std::result::Result<T, TitlexError>;
