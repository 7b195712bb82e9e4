//! `Group.Tag` key handling.
//!
//! Extractor keys arrive flattened as `Group.Tag` (for example
//! `PDF.Producer` or `File:System.FileName`). The group is everything before
//! the first `.`; the tag is everything after it, dots included. Keys with no
//! separator belong to the implicit [`DEFAULT_GROUP`] for ignore purposes but
//! keep their bare spelling everywhere else.

/// Separator between group and tag in a flattened key.
pub const KEY_SEPARATOR: char = '.';

/// Group assigned to keys that carry no explicit group.
pub const DEFAULT_GROUP: &str = "Default";

/// Borrowed view of a key split into its group and tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParts<'a> {
    /// Group name, or [`DEFAULT_GROUP`] when the key had no separator.
    pub group: &'a str,
    /// Bare tag name.
    pub tag: &'a str,
    /// Whether the group was spelled out in the key.
    pub explicit_group: bool,
}

/// Split `key` on the first [`KEY_SEPARATOR`].
///
/// ```rust
/// use normalize::{split_key, DEFAULT_GROUP};
///
/// let parts = split_key("File:System.FileName");
/// assert_eq!(parts.group, "File:System");
/// assert_eq!(parts.tag, "FileName");
///
/// let bare = split_key("producer");
/// assert_eq!(bare.group, DEFAULT_GROUP);
/// assert_eq!(bare.tag, "producer");
/// assert!(!bare.explicit_group);
/// ```
pub fn split_key(key: &str) -> KeyParts<'_> {
    match key.split_once(KEY_SEPARATOR) {
        Some((group, tag)) => KeyParts {
            group,
            tag,
            explicit_group: true,
        },
        None => KeyParts {
            group: DEFAULT_GROUP,
            tag: key,
            explicit_group: false,
        },
    }
}

/// Join a group and tag into a flattened key.
pub fn join_key(group: &str, tag: &str) -> String {
    let mut key = String::with_capacity(group.len() + tag.len() + 1);
    key.push_str(group);
    key.push(KEY_SEPARATOR);
    key.push_str(tag);
    key
}

/// Returns true when `key` equals `entry` or lives in the group named `entry`.
///
/// This is the matching rule for template-scoped ignore lists, where one
/// entry can name either a full key or a whole group.
pub fn key_matches_entry(key: &str, entry: &str) -> bool {
    if key == entry {
        return true;
    }
    let parts = split_key(key);
    parts.explicit_group && parts.group == entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_separator_only() {
        let parts = split_key("Hashes.First 1KB.SHA256");
        assert_eq!(parts.group, "Hashes");
        assert_eq!(parts.tag, "First 1KB.SHA256");
        assert!(parts.explicit_group);
    }

    #[test]
    fn empty_group_is_still_explicit() {
        let parts = split_key(".Orphan");
        assert_eq!(parts.group, "");
        assert_eq!(parts.tag, "Orphan");
        assert!(parts.explicit_group);
    }

    #[test]
    fn join_round_trips_with_split() {
        let key = join_key("PDF", "Producer");
        assert_eq!(key, "PDF.Producer");
        let parts = split_key(&key);
        assert_eq!((parts.group, parts.tag), ("PDF", "Producer"));
    }

    #[test]
    fn entry_matches_exact_key_or_group() {
        assert!(key_matches_entry("PDF.Producer", "PDF.Producer"));
        assert!(key_matches_entry("PDF.Producer", "PDF"));
        assert!(!key_matches_entry("PDFX.Producer", "PDF"));
        assert!(!key_matches_entry("PDF.Producer", "Producer"));
        // bare keys only match themselves, never the implicit group
        assert!(key_matches_entry("pages", "pages"));
        assert!(!key_matches_entry("pages", DEFAULT_GROUP));
    }
}
