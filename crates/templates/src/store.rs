use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::definition::TemplateDefinition;
use crate::error::{TemplateError, TemplateLoadErrors};
use crate::template::{Template, TemplateId};

/// Read-only collection of validated templates keyed by `(bank, family)`.
///
/// A store is only ever produced by one of the `load*` constructors and has
/// no mutating methods, so an `Arc<TemplateStore>` can be shared across
/// threads without locking.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: BTreeMap<TemplateId, Arc<Template>>,
    origins: BTreeMap<TemplateId, String>,
}

/// Outcome of one load: the accepted templates plus every rejection.
///
/// Malformed or duplicate definitions never abort a load; they end up in
/// [`rejected`](LoadReport::rejected) while the rest of the library loads.
#[derive(Debug, Clone)]
pub struct LoadReport {
    store: TemplateStore,
    rejected: Vec<TemplateError>,
}

impl LoadReport {
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn rejected(&self) -> &[TemplateError] {
        &self.rejected
    }

    /// True when nothing was rejected.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// All-or-nothing view: the store if every definition loaded, otherwise
    /// every rejection.
    pub fn into_strict(self) -> Result<TemplateStore, TemplateLoadErrors> {
        if self.rejected.is_empty() {
            Ok(self.store)
        } else {
            Err(TemplateLoadErrors(self.rejected))
        }
    }

    pub fn into_parts(self) -> (TemplateStore, Vec<TemplateError>) {
        (self.store, self.rejected)
    }
}

impl TemplateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and load definitions, each labelled with its origin.
    ///
    /// Definitions are processed in iteration order. When two share an
    /// identity, the first one stays and the second is rejected as a
    /// [`TemplateError::DuplicateTemplate`] naming both origins.
    pub fn load<I, S>(definitions: I) -> LoadReport
    where
        I: IntoIterator<Item = (S, TemplateDefinition)>,
        S: Into<String>,
    {
        let mut loader = Loader::start();
        for (origin, definition) in definitions {
            loader.accept(origin.into(), definition);
        }
        loader.finish()
    }

    /// Like [`load`](Self::load), parsing each document as JSON first.
    /// Unparseable documents are rejected as [`TemplateError::Parse`].
    pub fn load_json<I, S, J>(documents: I) -> LoadReport
    where
        I: IntoIterator<Item = (S, J)>,
        S: Into<String>,
        J: AsRef<str>,
    {
        let mut loader = Loader::start();
        for (origin, json) in documents {
            loader.accept_json(origin.into(), json.as_ref());
        }
        loader.finish()
    }

    /// Load every `*.json` file below `dir`, recursively, in sorted path
    /// order.
    ///
    /// The authoring layout is `<bank>/<family>/template.json`, but any
    /// nesting works; identity comes from the file contents, not the path.
    /// Unreadable entries are rejected as [`TemplateError::Io`].
    pub fn load_dir(dir: impl AsRef<Path>) -> LoadReport {
        let dir = dir.as_ref();
        let mut loader = Loader::start();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let origin = err.path().unwrap_or(dir).display().to_string();
                    loader.reject(TemplateError::Io {
                        origin,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let path = entry.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !entry.file_type().is_file() || !is_json {
                continue;
            }

            let origin = path.display().to_string();
            match fs::read_to_string(path) {
                Ok(json) => loader.accept_json(origin, &json),
                Err(err) => loader.reject(TemplateError::Io {
                    origin,
                    message: err.to_string(),
                }),
            }
        }

        loader.finish()
    }

    /// Look up one template. A miss is an ordinary [`TemplateError::NotFound`].
    pub fn lookup(&self, bank: &str, family: &str) -> Result<Arc<Template>, TemplateError> {
        self.templates
            .get(&TemplateId::new(bank, family))
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                bank: bank.to_string(),
                family: family.to_string(),
            })
    }

    pub fn get(&self, id: &TemplateId) -> Option<&Arc<Template>> {
        self.templates.get(id)
    }

    /// Where a loaded template came from.
    pub fn origin(&self, id: &TemplateId) -> Option<&str> {
        self.origins.get(id).map(String::as_str)
    }

    /// All templates in `(bank, family)` lexical order.
    pub fn templates(&self) -> impl Iterator<Item = &Arc<Template>> {
        self.templates.values()
    }

    /// Templates of one bank, in family order.
    pub fn in_bank<'a>(&'a self, bank: &'a str) -> impl Iterator<Item = &'a Arc<Template>> + 'a {
        self.templates
            .iter()
            .filter(move |(id, _)| id.bank == bank)
            .map(|(_, template)| template)
    }

    /// Distinct bank names, sorted.
    pub fn banks(&self) -> BTreeSet<&str> {
        self.templates.keys().map(|id| id.bank.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

struct Loader {
    start: Instant,
    store: TemplateStore,
    rejected: Vec<TemplateError>,
}

impl Loader {
    fn start() -> Self {
        Self {
            start: Instant::now(),
            store: TemplateStore::default(),
            rejected: Vec::new(),
        }
    }

    fn accept_json(&mut self, origin: String, json: &str) {
        match TemplateDefinition::from_json(json) {
            Ok(definition) => self.accept(origin, definition),
            Err(err) => self.reject(TemplateError::Parse {
                origin,
                message: err.to_string(),
            }),
        }
    }

    fn accept(&mut self, origin: String, definition: TemplateDefinition) {
        let identity = describe_identity(&definition.bank, &definition.family);
        let template = match Template::from_definition(definition) {
            Ok(template) => template,
            Err(reasons) => {
                self.reject(TemplateError::MalformedTemplate {
                    origin,
                    identity,
                    reasons,
                });
                return;
            }
        };

        let id = template.id().clone();
        if let Some(first) = self.store.origins.get(&id) {
            let err = TemplateError::DuplicateTemplate {
                identity: id,
                first: first.clone(),
                second: origin,
            };
            self.reject(err);
            return;
        }

        debug!(template = %id, origin = %origin, "template_accepted");
        self.store.origins.insert(id.clone(), origin);
        self.store.templates.insert(id, Arc::new(template));
    }

    fn reject(&mut self, err: TemplateError) {
        warn!(
            origin = err.origin().unwrap_or_default(),
            error = %err,
            "template_rejected"
        );
        self.rejected.push(err);
    }

    fn finish(self) -> LoadReport {
        let elapsed_micros = self.start.elapsed().as_micros();
        info!(
            loaded = self.store.len(),
            rejected = self.rejected.len(),
            elapsed_micros,
            "templates_loaded"
        );
        LoadReport {
            store: self.store,
            rejected: self.rejected,
        }
    }
}

fn describe_identity(bank: &str, family: &str) -> String {
    let part = |value: &str| {
        if value.trim().is_empty() {
            "<missing>".to_string()
        } else {
            value.to_string()
        }
    };
    format!("{}/{}", part(bank), part(family))
}
