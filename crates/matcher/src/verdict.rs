use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

/// A key whose value in the record is not one of the template's literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueMismatch {
    /// Value found in the record.
    pub actual: String,
    /// Every value the template accepts for this key.
    pub allowed: BTreeSet<String>,
}

/// A counter outside its template range, or missing from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeViolation {
    /// `None` when the record carries no such counter.
    pub actual: Option<i64>,
    pub min: i64,
    pub max: i64,
}

impl RangeViolation {
    pub fn is_absent(&self) -> bool {
        self.actual.is_none()
    }
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.actual {
            Some(actual) => write!(f, "{actual} not in [{}, {}]", self.min, self.max),
            None => write!(f, "absent, expected [{}, {}]", self.min, self.max),
        }
    }
}

/// Sizes of the verdict collections plus the keyset sizes they were computed
/// from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    /// Meaningful record keys, after global and template ignores.
    pub record_keys: usize,
    /// Keys the template expects.
    pub template_keys: usize,
    pub extra_keys: usize,
    pub missing_keys: usize,
    pub value_mismatches: usize,
    pub range_violations: usize,
}

/// Result of comparing one record against one template.
///
/// All four deviation classes are always computed. `is_match` is derived from
/// them when the verdict is built and cannot disagree with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchVerdict {
    extra_keys: BTreeSet<String>,
    missing_keys: BTreeSet<String>,
    value_mismatches: BTreeMap<String, ValueMismatch>,
    range_violations: BTreeMap<String, RangeViolation>,
    record_keys: usize,
    template_keys: usize,
    is_match: bool,
}

impl MatchVerdict {
    pub(crate) fn new(
        extra_keys: BTreeSet<String>,
        missing_keys: BTreeSet<String>,
        value_mismatches: BTreeMap<String, ValueMismatch>,
        range_violations: BTreeMap<String, RangeViolation>,
        record_keys: usize,
        template_keys: usize,
    ) -> Self {
        let is_match = extra_keys.is_empty()
            && missing_keys.is_empty()
            && value_mismatches.is_empty()
            && range_violations.is_empty();
        Self {
            extra_keys,
            missing_keys,
            value_mismatches,
            range_violations,
            record_keys,
            template_keys,
            is_match,
        }
    }

    /// True iff there are no extra keys, no missing keys, no value mismatches
    /// and no range violations.
    pub fn is_match(&self) -> bool {
        self.is_match
    }

    /// Meaningful record keys the template does not expect.
    pub fn extra_keys(&self) -> &BTreeSet<String> {
        &self.extra_keys
    }

    /// Expected keys absent from the meaningful record keys.
    pub fn missing_keys(&self) -> &BTreeSet<String> {
        &self.missing_keys
    }

    pub fn value_mismatches(&self) -> &BTreeMap<String, ValueMismatch> {
        &self.value_mismatches
    }

    pub fn range_violations(&self) -> &BTreeMap<String, RangeViolation> {
        &self.range_violations
    }

    /// Total number of deviations across all four classes. Used to rank
    /// closest candidates when nothing matches exactly.
    pub fn deviation_count(&self) -> usize {
        self.extra_keys.len()
            + self.missing_keys.len()
            + self.value_mismatches.len()
            + self.range_violations.len()
    }

    pub fn counts(&self) -> VerdictCounts {
        VerdictCounts {
            record_keys: self.record_keys,
            template_keys: self.template_keys,
            extra_keys: self.extra_keys.len(),
            missing_keys: self.missing_keys.len(),
            value_mismatches: self.value_mismatches.len(),
            range_violations: self.range_violations.len(),
        }
    }
}
