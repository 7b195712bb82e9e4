//! The normalized metadata record.
//!
//! ```text
//! MetadataRecord
//! ├── fields:   BTreeMap<String, String>   "Group.Tag" -> literal value
//! └── counters: BTreeMap<String, i64>      counter name -> measurement
//! ```
//!
//! Both maps are ordered, so two records built from the same pairs compare
//! and serialize identically no matter the insertion order.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One document's metadata as seen by the matcher.
///
/// Values are kept exactly as the extractor produced them; no trimming or type
/// coercion happens here. Counters are supplied already typed by the caller.
///
/// # Examples
///
/// ```rust
/// use normalize::MetadataRecord;
///
/// let record = MetadataRecord::new()
///     .with_field("producer", "OpenPDF 1.2.0")
///     .with_field("pages", "1")
///     .with_counter("obj_est", 17);
///
/// assert_eq!(record.get("producer"), Some("OpenPDF 1.2.0"));
/// assert_eq!(record.counter("obj_est"), Some(17));
/// assert_eq!(record.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    fields: BTreeMap<String, String>,
    #[serde(default)]
    counters: BTreeMap<String, i64>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from already-normalized parts. No ignore policy is applied.
    pub fn from_parts(fields: BTreeMap<String, String>, counters: BTreeMap<String, i64>) -> Self {
        Self { fields, counters }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_field(key, value);
        self
    }

    pub fn with_counter(mut self, name: impl Into<String>, value: i64) -> Self {
        self.insert_counter(name, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Insert or replace a counter, returning the previous value.
    pub fn insert_counter(&mut self, name: impl Into<String>, value: i64) -> Option<i64> {
        self.counters.insert(name.into(), value)
    }

    /// Attach a batch of counters.
    pub fn extend_counters<I, K>(&mut self, counters: I)
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        self.counters
            .extend(counters.into_iter().map(|(name, value)| (name.into(), value)));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn counter(&self, name: &str) -> Option<i64> {
        self.counters.get(name).copied()
    }

    /// Field keys in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn counters(&self) -> &BTreeMap<String, i64> {
        &self.counters
    }

    /// Number of fields (counters are not included).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields. Counters are not included,
    /// matching [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
