//! Label lines to field values.

use super::{FieldSpec, Label, LabelMatcher};
use crate::models::FieldRecord;
use crate::words::WordView;

/// Value part of a `label: value` line.
///
/// Takes the text after the last colon, or the whole text when there is no
/// colon, trimmed. A label without a value gives `None`.
pub fn extract_value(text: &str) -> Option<String> {
    let value = match text.rfind(':') {
        Some(pos) => &text[pos + 1..],
        None => text,
    }
    .trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolves labels to the text of their line and to their value.
#[derive(Debug, Clone, Default)]
pub struct LineExtractor {
    matcher: LabelMatcher,
}

impl LineExtractor {
    pub fn new(matcher: LabelMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &LabelMatcher {
        &self.matcher
    }

    /// Full text of the line holding `label`.
    pub fn line_text(&self, view: &WordView<'_>, label: &Label) -> Option<String> {
        self.matcher.find(view, label).map(|line| line.text())
    }

    /// Value following `label`.
    pub fn value(&self, view: &WordView<'_>, label: &Label) -> Option<String> {
        self.line_text(view, label)
            .as_deref()
            .and_then(extract_value)
    }

    /// Resolve every field of `schema`; unresolved fields stay `None`.
    pub fn record(&self, view: &WordView<'_>, schema: &[FieldSpec]) -> FieldRecord {
        let mut record = FieldRecord::new();
        for field in schema {
            record.insert(field.name, self.value(view, &field.label));
        }
        record
    }
}
