//! Family selection: run the matcher against every candidate template and
//! decide which family a record belongs to.
//!
//! Outcomes, in order of preference:
//!
//! | Status | `best` | `alternates` |
//! |--------|--------|--------------|
//! | [`Matched`](ClassificationStatus::Matched) | the single exact match | empty |
//! | [`Ambiguous`](ClassificationStatus::Ambiguous) | first exact match by `(bank, family)` | every exact match, sorted |
//! | [`ClosestCandidates`](ClassificationStatus::ClosestCandidates) | `None` | templates tied on fewest deviations, sorted |
//! | [`NoCandidates`](ClassificationStatus::NoCandidates) | `None` | empty |
use std::sync::Arc;

use normalize::MetadataRecord;
use serde::{Deserialize, Serialize};
use templates::{Template, TemplateId};
use tracing::debug;

use crate::compare::Matcher;
use crate::verdict::MatchVerdict;

/// Selector tuning knobs. Serde-friendly so it can live in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Restrict candidates to one bank. `None` considers every template.
    #[serde(default)]
    pub scope: Option<String>,
    /// Cap on the number of closest candidates reported when nothing
    /// matches exactly. `0` means no cap.
    #[serde(default)]
    pub max_closest: usize,
}

impl SelectorConfig {
    pub fn with_scope(mut self, bank: impl Into<String>) -> Self {
        self.scope = Some(bank.into());
        self
    }

    pub fn with_max_closest(mut self, max_closest: usize) -> Self {
        self.max_closest = max_closest;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStatus {
    /// Exactly one template matched.
    Matched,
    /// More than one template matched; the template library overlaps.
    Ambiguous,
    /// Nothing matched; the nearest misses are reported.
    ClosestCandidates,
    /// No template was in scope.
    NoCandidates,
}

/// One template together with its verdict for the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub template: Arc<Template>,
    pub verdict: MatchVerdict,
}

impl Candidate {
    pub fn id(&self) -> &TemplateId {
        self.template.id()
    }
}

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: ClassificationStatus,
    pub best: Option<Candidate>,
    pub alternates: Vec<Candidate>,
    /// Number of templates that were in scope and compared.
    pub evaluated: usize,
}

impl Classification {
    /// True when `best` is an exact match, ambiguous or not.
    pub fn is_match(&self) -> bool {
        matches!(
            self.status,
            ClassificationStatus::Matched | ClassificationStatus::Ambiguous
        )
    }

    pub fn is_ambiguous(&self) -> bool {
        self.status == ClassificationStatus::Ambiguous
    }

    /// Nearest misses, empty unless the status is `ClosestCandidates`.
    pub fn closest(&self) -> &[Candidate] {
        match self.status {
            ClassificationStatus::ClosestCandidates => &self.alternates,
            _ => &[],
        }
    }

    pub fn best_id(&self) -> Option<&TemplateId> {
        self.best.as_ref().map(Candidate::id)
    }
}

/// A [`Matcher`] plus selection settings.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    matcher: Matcher,
    config: SelectorConfig,
}

impl Selector {
    pub fn new(matcher: Matcher, config: SelectorConfig) -> Self {
        Self { matcher, config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Classify `record` against `templates` under the configured scope.
    pub fn classify<'a, I>(&self, record: &MetadataRecord, templates: I) -> Classification
    where
        I: IntoIterator<Item = &'a Arc<Template>>,
    {
        self.classify_in(record, templates, self.config.scope.as_deref())
    }

    /// Classify with an explicit scope, overriding the configured one.
    pub fn classify_in<'a, I>(
        &self,
        record: &MetadataRecord,
        templates: I,
        scope: Option<&str>,
    ) -> Classification
    where
        I: IntoIterator<Item = &'a Arc<Template>>,
    {
        let mut candidates: Vec<Candidate> = templates
            .into_iter()
            .filter(|template| scope.is_none_or(|bank| template.bank() == bank))
            .map(|template| Candidate {
                template: Arc::clone(template),
                verdict: self.matcher.compare(record, template),
            })
            .collect();
        // Input order must not leak into the result.
        candidates.sort_by(|a, b| a.id().cmp(b.id()));

        let evaluated = candidates.len();
        let classification = select(candidates, self.config.max_closest);

        debug!(
            status = ?classification.status,
            best = ?classification.best_id().map(ToString::to_string),
            alternates = classification.alternates.len(),
            evaluated,
            "family_selected"
        );

        Classification {
            evaluated,
            ..classification
        }
    }
}

/// Classify with the default matcher (template ignores only) and no cap on
/// closest candidates.
pub fn classify<'a, I>(
    record: &MetadataRecord,
    templates: I,
    scope: Option<&str>,
) -> Classification
where
    I: IntoIterator<Item = &'a Arc<Template>>,
{
    Selector::default().classify_in(record, templates, scope)
}

fn select(candidates: Vec<Candidate>, max_closest: usize) -> Classification {
    if candidates.is_empty() {
        return Classification {
            status: ClassificationStatus::NoCandidates,
            best: None,
            alternates: Vec::new(),
            evaluated: 0,
        };
    }

    let (mut matched, rest): (Vec<Candidate>, Vec<Candidate>) =
        candidates.into_iter().partition(|c| c.verdict.is_match());

    match matched.len() {
        0 => {
            let fewest = rest
                .iter()
                .map(|c| c.verdict.deviation_count())
                .min()
                .unwrap_or_default();
            let mut closest: Vec<Candidate> = rest
                .into_iter()
                .filter(|c| c.verdict.deviation_count() == fewest)
                .collect();
            if max_closest > 0 {
                closest.truncate(max_closest);
            }
            Classification {
                status: ClassificationStatus::ClosestCandidates,
                best: None,
                alternates: closest,
                evaluated: 0,
            }
        }
        1 => Classification {
            status: ClassificationStatus::Matched,
            best: matched.pop(),
            alternates: Vec::new(),
            evaluated: 0,
        },
        _ => Classification {
            status: ClassificationStatus::Ambiguous,
            best: matched.first().cloned(),
            alternates: matched,
            evaluated: 0,
        },
    }
}
