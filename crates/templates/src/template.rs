//! Validated, immutable templates.
//!
//! A [`Template`] can only be built through [`Template::from_definition`],
//! which checks every structural invariant up front. Once built it exposes
//! read-only accessors; nothing can change it afterwards.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, FixedOffset};
use normalize::key_matches_entry;
use serde::{Deserialize, Serialize};

use crate::definition::TemplateDefinition;
use crate::error::MalformedReason;

/// `(bank, family)` identity of a template.
///
/// Ordering is lexical on `bank`, then `family`; the family selector relies
/// on it for tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateId {
    pub bank: String,
    pub family: String,
}

impl TemplateId {
    pub fn new(bank: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            bank: bank.into(),
            family: family.into(),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bank, self.family)
    }
}

/// Inclusive integer bounds for one counter. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRange {
    min: i64,
    max: i64,
}

impl CounterRange {
    /// Returns `None` when `min > max`.
    pub fn new(min: i64, max: i64) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Inclusive on both ends.
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// A family fingerprint: what a matching document's metadata must look like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    id: TemplateId,
    expected: BTreeMap<String, BTreeSet<String>>,
    ranges: BTreeMap<String, CounterRange>,
    ignore: BTreeSet<String>,
    created_at: Option<DateTime<FixedOffset>>,
    samples_count: u32,
    notes: Option<String>,
}

impl Template {
    /// Validate a definition and freeze it into a template.
    ///
    /// All violations are collected, not just the first, so one pass over the
    /// error is enough to fix the source file. Duplicate literal values in an
    /// `expected` list collapse into one.
    pub fn from_definition(def: TemplateDefinition) -> Result<Self, Vec<MalformedReason>> {
        let TemplateDefinition {
            bank,
            family,
            created_at,
            samples_count,
            expected,
            ranges,
            ignore,
            notes,
        } = def;

        let mut reasons = Vec::new();

        if bank.trim().is_empty() {
            reasons.push(MalformedReason::EmptyBank);
        }
        if family.trim().is_empty() {
            reasons.push(MalformedReason::EmptyFamily);
        }

        let mut expected_sets = BTreeMap::new();
        for (key, values) in expected {
            if key.trim().is_empty() {
                reasons.push(MalformedReason::EmptyKey);
                continue;
            }
            if values.is_empty() {
                reasons.push(MalformedReason::EmptyValueSet { key });
                continue;
            }
            expected_sets.insert(key, values.into_iter().collect::<BTreeSet<_>>());
        }

        let mut counter_ranges = BTreeMap::new();
        for (counter, bounds) in ranges {
            if counter.trim().is_empty() {
                reasons.push(MalformedReason::EmptyCounterName);
                continue;
            }
            // null: no observations at authoring time, no constraint
            let Some([min, max]) = bounds else {
                continue;
            };
            match CounterRange::new(min, max) {
                Some(range) => {
                    counter_ranges.insert(counter, range);
                }
                None => reasons.push(MalformedReason::InvertedRange { counter, min, max }),
            }
        }

        if ignore.iter().any(|entry| entry.trim().is_empty()) {
            reasons.push(MalformedReason::EmptyIgnoreEntry);
        }

        if !reasons.is_empty() {
            return Err(reasons);
        }

        Ok(Self {
            id: TemplateId { bank, family },
            expected: expected_sets,
            ranges: counter_ranges,
            ignore: ignore.into_iter().collect(),
            created_at,
            samples_count,
            notes,
        })
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn bank(&self) -> &str {
        &self.id.bank
    }

    pub fn family(&self) -> &str {
        &self.id.family
    }

    /// Expected keys and their acceptable values.
    pub fn expected(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.expected
    }

    /// Acceptable values for one key, if the template expects it.
    pub fn allowed_values(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.expected.get(key)
    }

    pub fn ranges(&self) -> &BTreeMap<String, CounterRange> {
        &self.ranges
    }

    pub fn ignore(&self) -> &BTreeSet<String> {
        &self.ignore
    }

    /// True when `key` is excluded by this template's ignore list, either by
    /// exact key or by its group.
    pub fn ignores(&self, key: &str) -> bool {
        self.ignore.iter().any(|entry| key_matches_entry(key, entry))
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at
    }

    pub fn samples_count(&self) -> u32 {
        self.samples_count
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Convert back into the on-disk definition format.
    pub fn to_definition(&self) -> TemplateDefinition {
        TemplateDefinition {
            bank: self.id.bank.clone(),
            family: self.id.family.clone(),
            created_at: self.created_at,
            samples_count: self.samples_count,
            expected: self
                .expected
                .iter()
                .map(|(key, values)| (key.clone(), values.iter().cloned().collect()))
                .collect(),
            ranges: self
                .ranges
                .iter()
                .map(|(name, range)| (name.clone(), Some([range.min, range.max])))
                .collect(),
            ignore: self.ignore.iter().cloned().collect(),
            notes: self.notes.clone(),
        }
    }
}

impl TryFrom<TemplateDefinition> for Template {
    type Error = Vec<MalformedReason>;

    fn try_from(def: TemplateDefinition) -> Result<Self, Self::Error> {
        Template::from_definition(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> TemplateDefinition {
        TemplateDefinition {
            bank: "openpdf".into(),
            family: "family_1".into(),
            samples_count: 3,
            expected: BTreeMap::from([
                ("producer".to_string(), vec!["OpenPDF 1.2.0".to_string()]),
                (
                    "pdf_version".to_string(),
                    vec!["1.4".to_string(), "1.5".to_string(), "1.4".to_string()],
                ),
            ]),
            ranges: BTreeMap::from([
                ("obj_est".to_string(), Some([17, 17])),
                ("page0_images".to_string(), None),
            ]),
            ignore: vec!["hashes".to_string(), "system.FileName".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn valid_definition_builds() {
        let template = Template::from_definition(definition()).expect("valid template");
        assert_eq!(template.id(), &TemplateId::new("openpdf", "family_1"));
        assert_eq!(template.allowed_values("pdf_version").map(|v| v.len()), Some(2));
        assert_eq!(template.ranges().len(), 1);
        assert!(template.ranges().get("page0_images").is_none());
        assert_eq!(template.samples_count(), 3);
    }

    #[test]
    fn every_violation_is_reported() {
        let mut def = definition();
        def.bank = " ".into();
        def.family.clear();
        def.expected.insert("creator".into(), Vec::new());
        def.ranges.insert("fonts_cnt".into(), Some([3, 2]));
        def.ignore.push(String::new());

        let reasons = Template::from_definition(def).expect_err("invalid template");
        assert_eq!(
            reasons,
            vec![
                MalformedReason::EmptyBank,
                MalformedReason::EmptyFamily,
                MalformedReason::EmptyValueSet {
                    key: "creator".into()
                },
                MalformedReason::InvertedRange {
                    counter: "fonts_cnt".into(),
                    min: 3,
                    max: 2
                },
                MalformedReason::EmptyIgnoreEntry,
            ]
        );
    }

    #[test]
    fn degenerate_single_point_range_is_valid() {
        let range = CounterRange::new(5, 5).expect("min == max is allowed");
        assert!(range.contains(5));
        assert!(!range.contains(4));
        assert!(!range.contains(6));
        assert!(CounterRange::new(6, 5).is_none());
    }

    #[test]
    fn ignore_matches_keys_and_groups() {
        let template = Template::from_definition(definition()).expect("valid template");
        assert!(template.ignores("hashes.MD5"));
        assert!(template.ignores("system.FileName"));
        assert!(!template.ignores("system.FileSize"));
        assert!(!template.ignores("producer"));
    }

    #[test]
    fn identity_orders_lexically() {
        let mut ids = vec![
            TemplateId::new("b", "a"),
            TemplateId::new("a", "z"),
            TemplateId::new("a", "b"),
        ];
        ids.sort();
        assert_eq!(
            ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["a/b", "a/z", "b/a"]
        );
    }

    #[test]
    fn to_definition_drops_null_ranges_and_dedupes() {
        let template = Template::from_definition(definition()).expect("valid template");
        let def = template.to_definition();
        assert_eq!(def.expected["pdf_version"], vec!["1.4", "1.5"]);
        assert!(!def.ranges.contains_key("page0_images"));
        let rebuilt = Template::from_definition(def).expect("round trip stays valid");
        assert_eq!(rebuilt, template);
    }
}
