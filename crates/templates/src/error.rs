//! Error types produced by the template store.
//!
//! Every load-time failure names where the definition came from (`origin`,
//! usually a file path) and which invariant it broke, so the template file
//! can be fixed without re-running anything.
//!
//! # Error Categories
//!
//! | Error | When | Effect |
//! |-------|------|--------|
//! | [`MalformedTemplate`](TemplateError::MalformedTemplate) | load | definition rejected, load continues |
//! | [`DuplicateTemplate`](TemplateError::DuplicateTemplate) | load | second definition rejected, load continues |
//! | [`Parse`](TemplateError::Parse) | load | file skipped, load continues |
//! | [`Io`](TemplateError::Io) | load | file skipped, load continues |
//! | [`NotFound`](TemplateError::NotFound) | lookup | ordinary miss |
//!
//! # Examples
//!
//! ```rust
//! use templates::{MalformedReason, TemplateError};
//!
//! let err = TemplateError::MalformedTemplate {
//!     origin: "garanti/family_1/template.json".into(),
//!     identity: "garanti/family_1".into(),
//!     reasons: vec![MalformedReason::InvertedRange {
//!         counter: "obj_est".into(),
//!         min: 20,
//!         max: 17,
//!     }],
//! };
//! assert!(err.to_string().contains("obj_est"));
//! assert!(err.to_string().contains("garanti/family_1"));
//! ```
use std::fmt;

use thiserror::Error;

use crate::template::TemplateId;

/// A single structural invariant a template definition violated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedReason {
    /// `bank` is missing or blank.
    EmptyBank,
    /// `family` is missing or blank.
    EmptyFamily,
    /// An `expected` entry has a blank key.
    EmptyKey,
    /// An `expected` key maps to no acceptable values.
    EmptyValueSet { key: String },
    /// A `ranges` entry has a blank counter name.
    EmptyCounterName,
    /// A `ranges` entry has `min > max`.
    InvertedRange { counter: String, min: i64, max: i64 },
    /// An `ignore` entry is blank.
    EmptyIgnoreEntry,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::EmptyBank => write!(f, "bank must not be empty"),
            MalformedReason::EmptyFamily => write!(f, "family must not be empty"),
            MalformedReason::EmptyKey => write!(f, "expected contains a blank key"),
            MalformedReason::EmptyValueSet { key } => {
                write!(f, "expected[{key}] has no acceptable values")
            }
            MalformedReason::EmptyCounterName => write!(f, "ranges contains a blank counter name"),
            MalformedReason::InvertedRange { counter, min, max } => {
                write!(f, "ranges[{counter}] has min {min} > max {max}")
            }
            MalformedReason::EmptyIgnoreEntry => write!(f, "ignore contains a blank entry"),
        }
    }
}

/// Errors produced while loading or querying templates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateError {
    /// A definition violates one or more structural invariants.
    #[error("malformed template {identity} ({origin}): {}", join_reasons(.reasons))]
    MalformedTemplate {
        origin: String,
        /// `bank/family` as written; either half may be blank or missing, so
        /// this is not a [`TemplateId`].
        identity: String,
        reasons: Vec<MalformedReason>,
    },

    /// Two definitions share one `(bank, family)` identity. The first one
    /// loaded stays in the store.
    #[error("duplicate template {identity}: defined in {first} and {second}")]
    DuplicateTemplate {
        identity: TemplateId,
        first: String,
        second: String,
    },

    /// No template with this identity is loaded.
    #[error("template {bank}/{family} not found")]
    NotFound { bank: String, family: String },

    /// A template document is not valid JSON for the definition schema.
    #[error("failed to parse template {origin}: {message}")]
    Parse { origin: String, message: String },

    /// A template file or directory could not be read.
    #[error("failed to read {origin}: {message}")]
    Io { origin: String, message: String },
}

impl TemplateError {
    /// Returns true for errors raised while loading (everything but `NotFound`).
    pub fn is_load_error(&self) -> bool {
        !matches!(self, TemplateError::NotFound { .. })
    }

    /// The file or source label the error refers to, when there is one.
    pub fn origin(&self) -> Option<&str> {
        match self {
            TemplateError::MalformedTemplate { origin, .. }
            | TemplateError::Parse { origin, .. }
            | TemplateError::Io { origin, .. } => Some(origin),
            TemplateError::DuplicateTemplate { second, .. } => Some(second),
            TemplateError::NotFound { .. } => None,
        }
    }
}

fn join_reasons(reasons: &[MalformedReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// All rejections from one load, for callers that treat any rejection as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLoadErrors(pub Vec<TemplateError>);

impl TemplateLoadErrors {
    pub fn errors(&self) -> &[TemplateError] {
        &self.0
    }
}

impl fmt::Display for TemplateLoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} template(s) rejected", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for TemplateLoadErrors {}
