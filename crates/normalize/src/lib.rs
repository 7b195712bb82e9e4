//! metaprint key normalizer
//!
//! Metadata enters the matching pipeline here. An external extractor hands
//! us `Group.Tag -> value` pairs (or the nested `{Group: {Tag: value}}` shape
//! it prints natively); we flatten them, drop everything the global
//! [`IgnorePolicy`] says is noise, and hand back a [`MetadataRecord`].
//!
//! ## What we do here
//!
//! - **Split keys** on the first `.` into group and tag. Keys without a
//!   separator belong to [`DEFAULT_GROUP`].
//! - **Apply the ignore policy**: drop whole groups, bare tags in any group,
//!   or exact keys.
//! - **Keep values verbatim**. No trimming, no coercion. Counters travel
//!   separately, already typed by the caller.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no global state. Same pairs + same policy = same record,
//! whatever order the pairs arrive in (the record is backed by ordered maps).
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use normalize::{normalize, IgnorePolicy};
//!
//! let raw = BTreeMap::from([
//!     ("PDF.Producer".to_string(), "OpenPDF 1.2.0".to_string()),
//!     ("File:System.FileModifyDate".to_string(), "2025:12:28 14:55:54+03:00".to_string()),
//! ]);
//!
//! let record = normalize(raw, &IgnorePolicy::volatile());
//! assert_eq!(record.get("PDF.Producer"), Some("OpenPDF 1.2.0"));
//! assert!(!record.contains_key("File:System.FileModifyDate"));
//! ```
use tracing::{debug, trace};

mod key;
mod policy;
mod record;

pub use crate::key::{
    join_key, key_matches_entry, split_key, KeyParts, DEFAULT_GROUP, KEY_SEPARATOR,
};
pub use crate::policy::{IgnorePolicy, PolicyError};
pub use crate::record::MetadataRecord;

/// Normalize flattened `Group.Tag -> value` pairs under `policy`.
///
/// If the same key appears more than once, the last pair wins. Inputs that
/// are maps (the expected case) therefore normalize order-independently.
pub fn normalize<I, K, V>(raw: I, policy: &IgnorePolicy) -> MetadataRecord
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut record = MetadataRecord::new();
    let mut dropped = 0usize;

    for (key, value) in raw {
        let key: String = key.into();
        if policy.is_ignored(&key) {
            trace!(key = %key, "normalize_drop");
            dropped += 1;
            continue;
        }
        record.insert_field(key, value);
    }

    debug!(kept = record.len(), dropped, "normalize_complete");
    record
}

/// [`normalize`], then attach caller-supplied counters.
///
/// Counters are not subject to the ignore policy; they are named
/// measurements, not extractor keys.
pub fn normalize_with_counters<I, K, V, C, N>(
    raw: I,
    counters: C,
    policy: &IgnorePolicy,
) -> MetadataRecord
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    C: IntoIterator<Item = (N, i64)>,
    N: Into<String>,
{
    let mut record = normalize(raw, policy);
    record.extend_counters(counters);
    record
}

/// Normalize the extractor's nested `{Group: {Tag: value}}` structure.
///
/// Each `(group, tag)` pair is checked against `policy` with the group as
/// given, then flattened to `Group.Tag`. Pairs that flatten to the same key
/// collapse; the last one wins, as in [`normalize`].
///
/// ```
/// use std::collections::BTreeMap;
/// use normalize::{normalize_grouped, IgnorePolicy};
///
/// let grouped = BTreeMap::from([
///     ("PDF", BTreeMap::from([("Producer", "Skia/PDF m120"), ("PageCount", "1")])),
///     ("ExifTool", BTreeMap::from([("ExifToolVersion", "12.76")])),
/// ]);
///
/// let record = normalize_grouped(grouped, &IgnorePolicy::new().with_group("ExifTool"));
/// assert_eq!(record.keys().collect::<Vec<_>>(), vec!["PDF.PageCount", "PDF.Producer"]);
/// ```
pub fn normalize_grouped<I, G, M, T, V>(raw: I, policy: &IgnorePolicy) -> MetadataRecord
where
    I: IntoIterator<Item = (G, M)>,
    G: AsRef<str>,
    M: IntoIterator<Item = (T, V)>,
    T: AsRef<str>,
    V: Into<String>,
{
    let mut record = MetadataRecord::new();
    let mut dropped = 0usize;

    for (group, tags) in raw {
        let group = group.as_ref();
        for (tag, value) in tags {
            let tag = tag.as_ref();
            let key = join_key(group, tag);
            // Filter on the caller's group before flattening; a dotted group
            // would not survive a re-split of `key`.
            if policy.is_ignored_parts(group, tag, &key) {
                trace!(key = %key, "normalize_drop");
                dropped += 1;
                continue;
            }
            record.insert_field(key, value);
        }
    }

    debug!(kept = record.len(), dropped, "normalize_complete");
    record
}
