//! Repeating records (liens, vesting and conveyance instruments).
//!
//! Each record lives in its own visual block, introduced by an anchor label.
//! Every anchor candidate scopes the lookup to its block and resolves the
//! record's fixed schema there.

use std::collections::HashSet;

use tracing::debug;

use super::{FieldSpec, LineExtractor};
use crate::models::FieldRecord;
use crate::words::WordView;

/// Kind of repeating record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Lien,
    VestingInstrument,
    ConveyanceInstrument,
}

const LIEN_FIELDS: &[FieldSpec] = &[
    FieldSpec::two("Lien Type", "Lien", "Type:"),
    FieldSpec::two("Filed Against", "Filed", "Against:"),
    FieldSpec::one("Amount", "Amount:"),
    FieldSpec::two("Recorded Date", "Recorded", "Date:"),
    FieldSpec::two("Recording Information", "Recording", "Information:"),
    FieldSpec::one("Comment", "Comment:"),
];

const VESTING_FIELDS: &[FieldSpec] = &[
    FieldSpec::one("Type", "Type:"),
    FieldSpec::one("Executed", "Executed:"),
    FieldSpec::one("Recorded", "Recorded:"),
    FieldSpec::two("Recording Information", "Recording", "Information:"),
    FieldSpec::one("Comment", "Comment:"),
];

const CONVEYANCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::one("Type", "Type:"),
    FieldSpec::one("From", "From:"),
    FieldSpec::one("To", "To:"),
    FieldSpec::one("Executed", "Executed:"),
    FieldSpec::one("Recorded", "Recorded:"),
    FieldSpec::two("Recording Information", "Recording", "Information:"),
];

impl RecordKind {
    /// Two fragments that mark the start of a record.
    pub fn anchor(&self) -> (&'static str, &'static str) {
        match self {
            RecordKind::Lien => ("Lien", "Type:"),
            RecordKind::VestingInstrument => ("Vesting", "Instrument"),
            RecordKind::ConveyanceInstrument => ("Conveyance", "Instrument"),
        }
    }

    /// Fields of this record kind, in output order.
    pub fn schema(&self) -> &'static [FieldSpec] {
        match self {
            RecordKind::Lien => LIEN_FIELDS,
            RecordKind::VestingInstrument => VESTING_FIELDS,
            RecordKind::ConveyanceInstrument => CONVEYANCE_FIELDS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Lien => "lien",
            RecordKind::VestingInstrument => "vesting instrument",
            RecordKind::ConveyanceInstrument => "conveyance instrument",
        }
    }
}

/// Extracts all records of one kind from a view.
#[derive(Debug, Clone, Default)]
pub struct RecordGroupExtractor {
    lines: LineExtractor,
}

impl RecordGroupExtractor {
    pub fn new(lines: LineExtractor) -> Self {
        Self { lines }
    }

    /// One record per anchored block, in anchor rank order.
    ///
    /// A block yields at most one record, and records whose fields all
    /// resolve to null are dropped.
    pub fn extract(&self, view: &WordView<'_>, kind: RecordKind) -> Vec<FieldRecord> {
        let (first, second) = kind.anchor();
        let anchors = self.lines.matcher().candidates(view, first, second);
        debug!("Found {} {} anchor candidates", anchors.len(), kind.name());

        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for anchor in anchors {
            let block = anchor.line.block_key();
            if !seen.insert(block) {
                continue;
            }

            let record = self.lines.record(&view.block(block), kind.schema());
            if record.is_blank() {
                debug!(
                    "Discarding empty {} record at page {} block {}",
                    kind.name(),
                    block.page_idx,
                    block.block_idx
                );
                continue;
            }

            records.push(record);
        }

        records
    }
}
