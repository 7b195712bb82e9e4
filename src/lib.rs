//! Workspace umbrella crate for metaprint.
//!
//! metaprint decides which generator "family" produced a document by
//! comparing its extracted metadata against a library of curated templates.
//! This crate stitches the normalizer, template store and matcher together
//! behind one [`Classifier`] handle and re-exports their public types so most
//! callers only need this one dependency.
//!
//! ## Example
//!
//! ```
//! use metaprint::{Classifier, ClassificationStatus, IgnorePolicy, TemplateStore};
//!
//! let json = r#"{
//!     "bank": "openpdf",
//!     "family": "family_1",
//!     "expected": {"producer": ["OpenPDF 1.2.0"], "pages": ["1"], "encrypted": ["False"]},
//!     "ranges": {"obj_est": [17, 17], "fonts_cnt": [2, 2]}
//! }"#;
//! let store = TemplateStore::load_json([("openpdf/family_1/template.json", json)])
//!     .into_strict()
//!     .expect("template is valid");
//!
//! let classifier = Classifier::new(store, IgnorePolicy::volatile());
//! let result = classifier.classify_raw(
//!     [
//!         ("producer", "OpenPDF 1.2.0"),
//!         ("pages", "1"),
//!         ("encrypted", "False"),
//!         ("system.FileName", "statement.pdf"),
//!     ],
//!     [("obj_est", 17), ("fonts_cnt", 2)],
//! );
//!
//! assert_eq!(result.status, ClassificationStatus::Matched);
//! assert_eq!(result.best_id().map(ToString::to_string).as_deref(), Some("openpdf/family_1"));
//! ```
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{Level, info};

pub mod config;

pub use crate::config::{ConfigLoadError, MetaprintConfig, TemplatesConfig};
pub use matcher::{
    Candidate, Classification, ClassificationStatus, MatchVerdict, Matcher, RangeViolation,
    Selector, SelectorConfig, ValueMismatch, VerdictCounts, classify, compare,
};
pub use normalize::{
    IgnorePolicy, MetadataRecord, PolicyError, normalize, normalize_grouped,
    normalize_with_counters,
};
pub use templates::{
    CounterRange, LoadReport, MalformedReason, Template, TemplateDefinition, TemplateError,
    TemplateId, TemplateLoadErrors, TemplateStore,
};

/// Errors surfaced by the umbrella API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetaprintError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("template library rejected: {0}")]
    TemplateLoad(#[from] TemplateLoadErrors),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Shared, immutable classification handle.
///
/// Cloning is cheap: the template store sits behind an `Arc`, so clones can
/// be handed to worker threads freely.
#[derive(Debug, Clone)]
pub struct Classifier {
    store: Arc<TemplateStore>,
    policy: IgnorePolicy,
    selector: Selector,
}

impl Classifier {
    pub fn new(store: impl Into<Arc<TemplateStore>>, policy: IgnorePolicy) -> Self {
        Self::with_selector_config(store, policy, SelectorConfig::default())
    }

    pub fn with_selector_config(
        store: impl Into<Arc<TemplateStore>>,
        policy: IgnorePolicy,
        config: SelectorConfig,
    ) -> Self {
        let selector = Selector::new(Matcher::new(policy.clone()), config);
        Self {
            store: store.into(),
            policy,
            selector,
        }
    }

    /// Build a classifier from a validated config, loading the template
    /// directory it names.
    ///
    /// In strict mode any rejected definition fails the whole load. Otherwise
    /// rejections are logged by the store and the remaining templates are used.
    pub fn from_config(config: &MetaprintConfig) -> Result<Self, MetaprintError> {
        config.validate()?;
        let report = TemplateStore::load_dir(config.template_dir()?);
        let store = if config.templates.strict {
            report.into_strict()?
        } else {
            report.into_parts().0
        };
        Ok(Self::with_selector_config(
            store,
            config.ignore.clone(),
            config.selector.clone(),
        ))
    }

    /// Load the YAML config at `path`, then [`from_config`](Self::from_config).
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, MetaprintError> {
        let config = MetaprintConfig::from_file(path)?;
        Self::from_config(&config)
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn policy(&self) -> &IgnorePolicy {
        &self.policy
    }

    pub fn selector_config(&self) -> &SelectorConfig {
        self.selector.config()
    }

    /// Normalize flattened extractor output under this classifier's policy.
    pub fn normalize<I, K, V, C, N>(&self, raw: I, counters: C) -> MetadataRecord
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        C: IntoIterator<Item = (N, i64)>,
        N: Into<String>,
    {
        normalize_with_counters(raw, counters, &self.policy)
    }

    /// Compare a record against one named template.
    pub fn compare(
        &self,
        record: &MetadataRecord,
        bank: &str,
        family: &str,
    ) -> Result<MatchVerdict, TemplateError> {
        let template = self.store.lookup(bank, family)?;
        Ok(self.selector.matcher().compare(record, &template))
    }

    /// Classify a record under the configured scope.
    pub fn classify(&self, record: &MetadataRecord) -> Classification {
        self.classify_in(record, self.selector.config().scope.as_deref())
    }

    /// Classify a record restricted to `scope` (or every bank for `None`).
    pub fn classify_in(&self, record: &MetadataRecord, scope: Option<&str>) -> Classification {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "metaprint.classify",
            scope = scope.unwrap_or("*"),
            keys = record.len()
        );
        let _guard = span.enter();

        let result = self
            .selector
            .classify_in(record, self.store.templates(), scope);

        let elapsed_micros = start.elapsed().as_micros();
        info!(
            status = ?result.status,
            best = ?result.best_id().map(ToString::to_string),
            candidates = result.alternates.len(),
            evaluated = result.evaluated,
            elapsed_micros,
            "classify_success"
        );
        result
    }

    /// Normalize raw pairs plus counters, then classify.
    pub fn classify_raw<I, K, V, C, N>(&self, raw: I, counters: C) -> Classification
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        C: IntoIterator<Item = (N, i64)>,
        N: Into<String>,
    {
        let record = self.normalize(raw, counters);
        self.classify(&record)
    }

    /// Classify many records. Results keep the input order.
    #[cfg(feature = "parallel")]
    pub fn classify_batch(&self, records: &[MetadataRecord]) -> Vec<Classification> {
        use rayon::prelude::*;

        records.par_iter().map(|record| self.classify(record)).collect()
    }

    /// Classify many records. Results keep the input order.
    #[cfg(not(feature = "parallel"))]
    pub fn classify_batch(&self, records: &[MetadataRecord]) -> Vec<Classification> {
        records.iter().map(|record| self.classify(record)).collect()
    }
}
