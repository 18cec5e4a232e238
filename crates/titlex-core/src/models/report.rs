//! Output data model of a title report extraction.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Field name to extracted value for one occurrence of a record.
///
/// Keys keep their schema order and every schema key is present; a value
/// that could not be extracted is `None` and serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRecord {
    entries: Vec<(String, Option<String>)>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an earlier value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of a field; `None` both for unknown names and null values.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// True when no field resolved to a value.
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Names of the fields that resolved to null.
    pub fn missing(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, v)| v.is_none())
            .map(|(n, _)| n)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One reconstructed table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TableRow(pub Vec<Option<String>>);

impl TableRow {
    pub fn cells(&self) -> &[Option<String>] {
        &self.0
    }

    pub fn cell(&self, col: usize) -> Option<&str> {
        self.0.get(col).and_then(|c| c.as_deref())
    }
}

/// Column names of the federal tax lien table.
pub const TAX_LIEN_COLUMNS: [&str; 6] = [
    "Kind of Tax",
    "Tax Period Ending",
    "Identifying Number",
    "Date of Assessment",
    "Last Day for Refiling",
    "Unpaid Balance",
];

/// A reconstructed federal tax lien table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxLienTable {
    /// Page the table was found on.
    pub page_idx: usize,
    /// Rows; the first one is the header.
    pub rows: Vec<TableRow>,
}

impl TaxLienTable {
    /// Header row (first row).
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// Data rows (all rows except header).
    pub fn data_rows(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Everything extracted from one title report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TitleReport {
    /// Flat header fields (company name, county, ...).
    #[serde(flatten)]
    pub fields: FieldRecord,

    /// Every parcel identifier found in the report.
    pub parcel_ids: Vec<String>,

    pub liens: Vec<FieldRecord>,

    pub vesting_instruments: Vec<FieldRecord>,

    pub conveyance_instruments: Vec<FieldRecord>,

    pub tax_lien_tables: Vec<TaxLienTable>,
}
