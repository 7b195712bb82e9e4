use std::collections::{BTreeMap, BTreeSet};

use normalize::{IgnorePolicy, MetadataRecord};
use templates::Template;
use tracing::trace;

use crate::verdict::{MatchVerdict, RangeViolation, ValueMismatch};


/// Compare a normalized record against one template.
///
/// The record is assumed to have been through [`normalize`](normalize::normalize)
/// already; only the template's own ignore list is applied here. Use
/// [`Matcher`] to re-apply a global policy at comparison time.
pub fn compare(record: &MetadataRecord, template: &Template) -> MatchVerdict {
    compare_with(record, template, None)
}

/// Comparison with an explicit global ignore policy.
///
/// The policy is applied on top of whatever the normalizer dropped, so a
/// record that skipped normalization still compares correctly and an
/// already-normalized record is unaffected.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    policy: IgnorePolicy,
}

impl Matcher {
    pub fn new(policy: IgnorePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IgnorePolicy {
        &self.policy
    }

    pub fn compare(&self, record: &MetadataRecord, template: &Template) -> MatchVerdict {
        compare_with(record, template, Some(&self.policy))
    }
}

fn compare_with(
    record: &MetadataRecord,
    template: &Template,
    policy: Option<&IgnorePolicy>,
) -> MatchVerdict {
    // The global policy only filters the record. The template's own ignore
    // list takes keys out of the comparison on both sides.
    let meaningful: BTreeSet<&str> = record
        .keys()
        .filter(|key| !policy.is_some_and(|policy| policy.is_ignored(key)))
        .filter(|key| !template.ignores(key))
        .collect();

    let expected: BTreeMap<&str, &BTreeSet<String>> = template
        .expected()
        .iter()
        .filter(|(key, _)| !template.ignores(key))
        .map(|(key, values)| (key.as_str(), values))
        .collect();

    let extra_keys: BTreeSet<String> = meaningful
        .iter()
        .filter(|key| !expected.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    let missing_keys: BTreeSet<String> = expected
        .keys()
        .filter(|key| !meaningful.contains(**key))
        .map(|key| key.to_string())
        .collect();

    let mut value_mismatches = BTreeMap::new();
    for (&key, &allowed) in &expected {
        if !meaningful.contains(key) {
            continue;
        }
        let Some(actual) = record.get(key) else {
            continue;
        };
        if !allowed.contains(actual) {
            value_mismatches.insert(
                key.to_string(),
                ValueMismatch {
                    actual: actual.to_string(),
                    allowed: allowed.clone(),
                },
            );
        }
    }

    let mut range_violations = BTreeMap::new();
    for (counter, range) in template.ranges() {
        let actual = record.counter(counter);
        if actual.is_some_and(|value| range.contains(value)) {
            continue;
        }
        range_violations.insert(
            counter.clone(),
            RangeViolation {
                actual,
                min: range.min(),
                max: range.max(),
            },
        );
    }

    let verdict = MatchVerdict::new(
        extra_keys,
        missing_keys,
        value_mismatches,
        range_violations,
        meaningful.len(),
        expected.len(),
    );

    trace!(
        template = %template.id(),
        is_match = verdict.is_match(),
        deviations = verdict.deviation_count(),
        "compare_complete"
    );

    verdict
}
