//! Field extraction over a word table.
//!
//! Everything here is a read-only query against a [`WordView`]: labels are
//! located with [`LabelMatcher`], their line value is split off by
//! [`LineExtractor`], and repeating records and tables are assembled on top
//! of those two primitives.
//!
//! [`WordView`]: crate::words::WordView

mod line;
mod matcher;
mod records;
mod report;
mod table;

pub use line::{extract_value, LineExtractor};
pub use matcher::{similarity_ratio, LabelMatch, LabelMatcher};
pub use records::{RecordGroupExtractor, RecordKind};
pub use report::{ExtractionResult, ReportExtractor, HEADER_FIELDS, PARCEL_ID_LABEL};
pub use table::TableExtractor;

/// A label to look for: one fragment, or two fragments that OCR usually
/// splits into separate words ("Lien" / "Type:").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    One(&'static str),
    Two(&'static str, &'static str),
}

/// A named field and the label that introduces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: Label,
}

impl FieldSpec {
    pub const fn one(name: &'static str, fragment: &'static str) -> Self {
        Self {
            name,
            label: Label::One(fragment),
        }
    }

    pub const fn two(name: &'static str, first: &'static str, second: &'static str) -> Self {
        Self {
            name,
            label: Label::Two(first, second),
        }
    }
}
