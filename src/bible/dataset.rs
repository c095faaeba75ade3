//! Raw dataset reading.
//!
//! The dataset is one JSON object mapping `"<Book> <chapter>:<verse>"` keys to
//! `{ "text": ..., "reference": ... }` records. Key order matters (it becomes
//! the book order), so the object is read through a map visitor instead of a
//! `HashMap`.

use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// One passage as delivered by the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Dataset key, e.g. `"Genesis 1:1"`.
    pub key: String,
    /// Passage body.
    pub text: String,
    /// Display reference, when the record carries one.
    pub reference: Option<String>,
}

impl RawEntry {
    /// Build an entry from its parts.
    pub fn new(key: impl Into<String>, text: impl Into<String>, reference: Option<&str>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            reference: reference.map(str::to_string),
        }
    }
}

/// Record shape inside the dataset object.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

/// All entries of a dataset, in source order.
#[derive(Debug, Default)]
pub struct RawDataset {
    entries: Vec<RawEntry>,
    /// Values that were not `{text, reference}` records.
    rejected: usize,
}

impl RawDataset {
    /// Parse a dataset from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(e.to_string(), None))
    }

    /// Read and parse a dataset file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .map_err(|e| Error::io(e, path.to_path_buf()))?;
        serde_json::from_str(&content).map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[RawEntry] {
        &self.entries
    }

    /// Number of values skipped because they were not records.
    pub const fn rejected(&self) -> usize {
        self.rejected
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the dataset, yielding its entries.
    pub fn into_entries(self) -> Vec<RawEntry> {
        self.entries
    }
}

impl<'de> Deserialize<'de> for RawDataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DatasetVisitor)
    }
}

struct DatasetVisitor;

impl<'de> Visitor<'de> for DatasetVisitor {
    type Value = RawDataset;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping references to {text, reference} records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut dataset = RawDataset::default();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            match RawRecord::deserialize(value) {
                Ok(record) => dataset.entries.push(RawEntry {
                    key,
                    text: record.text.unwrap_or_default(),
                    reference: record.reference.filter(|r| !r.trim().is_empty()),
                }),
                Err(e) => {
                    tracing::debug!("Skipping dataset value for {key:?}: {e}");
                    dataset.rejected += 1;
                }
            }
        }
        Ok(dataset)
    }
}
