//! Global ignore policy.
//!
//! [`IgnorePolicy`] describes which metadata keys never take part in family
//! matching, regardless of the template being compared against. It is a plain
//! serde value passed explicitly to [`normalize`](crate::normalize) and to the
//! matcher, so each call sees exactly the policy it was given.
//!
//! # Serialization
//!
//! ```json
//! {
//!   "groups": ["File:System"],
//!   "tags": ["FileModifyDate", "ExifToolVersion"],
//!   "keys": ["hashes.SHA256"]
//! }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use normalize::IgnorePolicy;
//!
//! let policy = IgnorePolicy::new()
//!     .with_group("ExifTool")
//!     .with_tag("ModifyDate");
//!
//! assert!(policy.is_ignored("ExifTool.ExifToolVersion"));
//! assert!(policy.is_ignored("XMP.ModifyDate"));
//! assert!(!policy.is_ignored("PDF.Producer"));
//! ```
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::split_key;

/// Keys, groups and bare tags excluded from every comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnorePolicy {
    /// Whole groups to drop (`File:System`, `ExifTool`, ...).
    pub groups: BTreeSet<String>,

    /// Bare tags dropped in any group (`FileModifyDate` drops
    /// `File:System.FileModifyDate` and `XMP.FileModifyDate` alike).
    pub tags: BTreeSet<String>,

    /// Exact flattened keys to drop.
    pub keys: BTreeSet<String>,
}

impl IgnorePolicy {
    /// An empty policy that keeps every key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for fields that vary per download or per extractor run:
    /// filesystem timestamps and paths, file hashes, and the extractor's own
    /// version tag.
    pub fn volatile() -> Self {
        let tags = [
            "FileAccessDate",
            "FileModifyDate",
            "FileInodeChangeDate",
            "FileName",
            "FilePermissions",
            "Directory",
            "ExifToolVersion",
        ];
        let keys = [
            "system.FileAccessDate",
            "system.FileModifyDate",
            "system.FileInodeChangeDate",
            "system.FileName",
            "hashes.SHA256",
            "hashes.MD5",
            "hashes.First 1KB SHA256",
            "hashes.Last  1KB SHA256",
        ];
        Self {
            groups: BTreeSet::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    /// True when the policy drops nothing.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.tags.is_empty() && self.keys.is_empty()
    }

    /// Decide whether `key` is dropped by this policy.
    ///
    /// A key is ignored when it is listed in `keys`, when its group is listed
    /// in `groups`, or when its bare tag is listed in `tags`. Keys without a
    /// group are checked against [`DEFAULT_GROUP`](crate::DEFAULT_GROUP).
    pub fn is_ignored(&self, key: &str) -> bool {
        let parts = split_key(key);
        self.is_ignored_parts(parts.group, parts.tag, key)
    }

    /// Same decision as [`is_ignored`](Self::is_ignored) for a key whose group
    /// and tag are already known. `key` is the flattened form checked against
    /// `keys`; the group is taken as given, even when it contains a `.`.
    pub fn is_ignored_parts(&self, group: &str, tag: &str, key: &str) -> bool {
        self.keys.contains(key) || self.groups.contains(group) || self.tags.contains(tag)
    }

    /// Union of two policies. Merging never re-includes a key either side drops.
    pub fn merged(&self, other: &IgnorePolicy) -> IgnorePolicy {
        IgnorePolicy {
            groups: self.groups.union(&other.groups).cloned().collect(),
            tags: self.tags.union(&other.tags).cloned().collect(),
            keys: self.keys.union(&other.keys).cloned().collect(),
        }
    }

    /// Reject blank entries, which would otherwise silently match nothing
    /// (or, for groups, the empty group of `.Tag` keys).
    pub fn validate(&self) -> Result<(), PolicyError> {
        let blank = |set: &BTreeSet<String>| set.iter().any(|s| s.trim().is_empty());
        if blank(&self.groups) {
            return Err(PolicyError::BlankEntry { field: "groups" });
        }
        if blank(&self.tags) {
            return Err(PolicyError::BlankEntry { field: "tags" });
        }
        if blank(&self.keys) {
            return Err(PolicyError::BlankEntry { field: "keys" });
        }
        Ok(())
    }
}

/// Validation failures for [`IgnorePolicy`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyError {
    /// An ignore list contains an empty or whitespace-only entry.
    #[error("ignore policy `{field}` contains a blank entry")]
    BlankEntry { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_tag_and_key_rules_each_drop() {
        let policy = IgnorePolicy::new()
            .with_group("File:System")
            .with_tag("CreateDate")
            .with_key("hashes.MD5");

        assert!(policy.is_ignored("File:System.FileSize"));
        assert!(policy.is_ignored("PDF.CreateDate"));
        assert!(policy.is_ignored("XMP-xmp.CreateDate"));
        assert!(policy.is_ignored("hashes.MD5"));
        assert!(!policy.is_ignored("hashes.SHA256"));
        assert!(!policy.is_ignored("PDF.Producer"));
    }

    #[test]
    fn bare_keys_use_default_group_and_own_tag() {
        let by_group = IgnorePolicy::new().with_group(crate::DEFAULT_GROUP);
        assert!(by_group.is_ignored("producer"));
        assert!(!by_group.is_ignored("PDF.Producer"));

        let by_tag = IgnorePolicy::new().with_tag("producer");
        assert!(by_tag.is_ignored("producer"));
    }

    #[test]
    fn volatile_policy_drops_filesystem_noise() {
        let policy = IgnorePolicy::volatile();
        assert!(policy.is_ignored("File:System.FileModifyDate"));
        assert!(policy.is_ignored("ExifTool.ExifToolVersion"));
        assert!(policy.is_ignored("hashes.Last  1KB SHA256"));
        assert!(!policy.is_ignored("PDF.Producer"));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn merged_is_a_union() {
        let a = IgnorePolicy::new().with_group("A").with_tag("T1");
        let b = IgnorePolicy::new().with_group("B").with_key("C.K");
        let merged = a.merged(&b);
        assert!(merged.is_ignored("A.x"));
        assert!(merged.is_ignored("B.x"));
        assert!(merged.is_ignored("Z.T1"));
        assert!(merged.is_ignored("C.K"));
        assert!(!merged.is_ignored("C.L"));
    }

    #[test]
    fn parts_check_trusts_the_given_group() {
        let policy = IgnorePolicy::new().with_group("XMP.dc");
        assert!(policy.is_ignored_parts("XMP.dc", "Title", "XMP.dc.Title"));
        // Re-splitting the flattened key would yield group `XMP`.
        assert!(!policy.is_ignored("XMP.dc.Title"));

        let by_key = IgnorePolicy::new().with_key("XMP.dc.Title");
        assert!(by_key.is_ignored_parts("XMP.dc", "Title", "XMP.dc.Title"));
        assert!(!by_key.is_ignored_parts("XMP.dc", "Creator", "XMP.dc.Creator"));
    }

    #[test]
    fn blank_entries_rejected() {
        let policy = IgnorePolicy::new().with_tag("  ");
        assert_eq!(
            policy.validate(),
            Err(PolicyError::BlankEntry { field: "tags" })
        );
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let policy: IgnorePolicy =
            serde_json::from_str(r#"{"groups":["ExifTool"]}"#).expect("valid policy json");
        assert!(policy.tags.is_empty());
        assert!(policy.is_ignored("ExifTool.ExifToolVersion"));
    }
}
