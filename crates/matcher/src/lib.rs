//! # metaprint matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the normalizer (`normalize`) and the template
//! store (`templates`). Given one document's [`MetadataRecord`] it answers two
//! questions:
//!
//! - Does this record match a given template, and if not, exactly how does it
//!   deviate? ([`compare`], [`Matcher`])
//! - Which family, out of a library of templates, does the record belong to?
//!   ([`classify`], [`Selector`])
//!
//! ## Comparison
//!
//! A comparison always runs all four checks and reports every deviation:
//!
//! - `extra_keys`: meaningful record keys the template does not expect.
//! - `missing_keys`: expected keys the record does not have.
//! - `value_mismatches`: shared keys whose value is not an allowed literal.
//! - `range_violations`: counters outside their inclusive range, or absent.
//!
//! A [`MatchVerdict`] is a match iff all four are empty.
//!
//! ## Example Usage
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use matcher::{classify, compare, ClassificationStatus};
//! use normalize::MetadataRecord;
//! use templates::{Template, TemplateDefinition};
//!
//! let template = Template::from_definition(TemplateDefinition {
//!     bank: "openpdf".into(),
//!     family: "family_1".into(),
//!     expected: BTreeMap::from([("producer".to_string(), vec!["OpenPDF 1.2.0".to_string()])]),
//!     ranges: BTreeMap::from([("obj_est".to_string(), Some([17, 17]))]),
//!     ..Default::default()
//! })
//! .expect("valid template");
//!
//! let record = MetadataRecord::new()
//!     .with_field("producer", "OpenPDF 1.2.0")
//!     .with_counter("obj_est", 18);
//!
//! let verdict = compare(&record, &template);
//! assert!(!verdict.is_match());
//! assert_eq!(verdict.range_violations()["obj_est"].actual, Some(18));
//!
//! let library = vec![Arc::new(template)];
//! let result = classify(&record, &library, None);
//! assert_eq!(result.status, ClassificationStatus::ClosestCandidates);
//! ```
//!
//! ## Observability
//!
//! Each comparison emits a `compare_complete` trace event and each selection a
//! `family_selected` debug event. Nothing here installs a subscriber.

mod compare;
mod selector;
mod verdict;

pub use crate::compare::{compare, Matcher};
pub use crate::selector::{
    classify, Candidate, Classification, ClassificationStatus, Selector, SelectorConfig,
};
pub use crate::verdict::{MatchVerdict, RangeViolation, ValueMismatch, VerdictCounts};
