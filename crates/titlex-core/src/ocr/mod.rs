//! OCR export model.
//!
//! The OCR engine is an external collaborator. It hands over a nested
//! document (pages, blocks, lines, words) with every word carrying a
//! two-point bounding box in normalized page coordinates. A freshly
//! produced export and one reloaded from disk have the same shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Two-point geometry `[[x1, y1], [x2, y2]]`, normalized to the page.
pub type Geometry = [[f64; 2]; 2];

/// Root of an OCR export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrExport {
    /// Pages in document order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<ExportPage>>,
}

/// A single page of the export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportPage {
    /// Page index as reported by the OCR engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_idx: Option<usize>,

    /// Page dimensions in pixels (height, width).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<ExportBlock>>,
}

/// A visual block of text lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<ExportLine>>,
}

/// A line of words.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<ExportWord>>,
}

/// A recognized word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportWord {
    /// Recognized text.
    pub value: String,

    /// Recognition confidence (0.0 - 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Bounding box.
    pub geometry: Geometry,
}

impl ExportWord {
    pub fn new(value: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            value: value.into(),
            confidence: None,
            geometry,
        }
    }
}

impl OcrExport {
    /// Parse an export from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a previously persisted export.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize the export in its persisted form.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Persist the export so a later run can reuse it.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Pages of the export, failing when the level is absent or empty.
    pub fn require_pages(&self) -> std::result::Result<&[ExportPage], ExportError> {
        match &self.pages {
            None => Err(ExportError::MissingLevel {
                level: "pages",
                path: "$".to_string(),
            }),
            Some(pages) if pages.is_empty() => Err(ExportError::NoPages),
            Some(pages) => Ok(pages),
        }
    }
}

/// Resolve an optional nesting level or report where it is missing.
pub(crate) fn require_level<'a, T>(
    level: &'static str,
    items: &'a Option<Vec<T>>,
    path: impl FnOnce() -> String,
) -> std::result::Result<&'a [T], ExportError> {
    items
        .as_deref()
        .ok_or_else(|| ExportError::MissingLevel { level, path: path() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCTR_SAMPLE: &str = r#"{
        "pages": [{
            "page_idx": 0,
            "dimensions": [2200, 1700],
            "orientation": {"value": null, "confidence": null},
            "blocks": [{
                "geometry": [[0.1, 0.1], [0.5, 0.12]],
                "lines": [{
                    "geometry": [[0.1, 0.1], [0.5, 0.12]],
                    "words": [
                        {"value": "County:", "confidence": 0.99,
                         "geometry": [[0.1, 0.1], [0.16, 0.12]]},
                        {"value": "Duval", "confidence": 0.97,
                         "geometry": [[0.17, 0.1], [0.22, 0.12]]}
                    ]
                }],
                "artefacts": []
            }]
        }]
    }"#;

    #[test]
    fn test_parse_doctr_export() {
        let export = OcrExport::from_json(DOCTR_SAMPLE).unwrap();
        let pages = export.require_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].dimensions, Some((2200, 1700)));

        let words = pages[0].blocks.as_ref().unwrap()[0].lines.as_ref().unwrap()[0]
            .words
            .as_ref()
            .unwrap();
        assert_eq!(words[1].value, "Duval");
        assert_eq!(words[1].geometry, [[0.17, 0.1], [0.22, 0.12]]);
    }

    #[test]
    fn test_persisted_form_reloads_identically() {
        let export = OcrExport::from_json(DOCTR_SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        export.save(&path).unwrap();
        let reloaded = OcrExport::from_file(&path).unwrap();

        assert_eq!(
            export.to_json_pretty().unwrap(),
            reloaded.to_json_pretty().unwrap()
        );
    }

    #[test]
    fn test_missing_pages() {
        let export = OcrExport::from_json("{}").unwrap();
        assert!(matches!(
            export.require_pages(),
            Err(ExportError::MissingLevel { level: "pages", .. })
        ));

        let export = OcrExport::from_json(r#"{"pages": []}"#).unwrap();
        assert_eq!(export.require_pages().unwrap_err(), ExportError::NoPages);
    }
}
