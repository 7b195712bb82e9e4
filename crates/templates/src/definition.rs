//! On-disk template definition format.
//!
//! This is the durable contract an authoring tool must produce to add a new
//! family. It is deliberately loose (everything defaults) so that a missing
//! field surfaces as a precise [`MalformedReason`](crate::MalformedReason)
//! from validation instead of an opaque parse error.
//!
//! ```json
//! {
//!   "bank": "openpdf",
//!   "family": "family_1",
//!   "created_at": "2025-12-28T14:55:54+03:00",
//!   "samples_count": 12,
//!   "expected": {
//!     "producer": ["OpenPDF 1.2.0"],
//!     "pages": ["1"],
//!     "encrypted": ["False"]
//!   },
//!   "ranges": {
//!     "obj_est": [17, 17],
//!     "fonts_cnt": [2, 2],
//!     "xobjects_cnt": null
//!   },
//!   "ignore": ["system.FileName", "hashes"],
//!   "notes": ""
//! }
//! ```
//!
//! A `null` range means the authoring run saw no observations for that
//! counter; it places no constraint on it.
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Raw, unvalidated template definition as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    #[serde(default)]
    pub bank: String,

    #[serde(default)]
    pub family: String,

    /// Capture time of the template. Provenance only.
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,

    /// Number of sample documents the template was built from. Provenance only.
    #[serde(default)]
    pub samples_count: u32,

    /// Key -> acceptable literal values.
    #[serde(default)]
    pub expected: BTreeMap<String, Vec<String>>,

    /// Counter -> inclusive `[min, max]`, or `null` for no constraint.
    #[serde(default)]
    pub ranges: BTreeMap<String, Option<[i64; 2]>>,

    /// Keys or group names excluded from the keyset comparison.
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TemplateDefinition {
    /// Parse a definition from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
