//! metaprint template store
//!
//! A template is the fingerprint of one document family: the metadata keys a
//! generator always writes, the literal values it writes for them, and the
//! integer ranges its structural counters fall into. This crate turns
//! human-curated JSON definitions into validated, immutable [`Template`]
//! values and keeps them in a read-only [`TemplateStore`].
//!
//! ## Loading
//!
//! - [`TemplateStore::load`] takes already-parsed [`TemplateDefinition`]s.
//! - [`TemplateStore::load_json`] takes JSON documents.
//! - [`TemplateStore::load_dir`] walks a directory tree for `*.json` files.
//!
//! Every loader returns a [`LoadReport`]. Bad definitions are collected as
//! [`TemplateError`]s while the rest of the library still loads; call
//! [`LoadReport::into_strict`] to treat any rejection as fatal.
//!
//! ## Example
//!
//! ```
//! use templates::TemplateStore;
//!
//! let json = r#"{
//!     "bank": "openpdf",
//!     "family": "family_1",
//!     "expected": {"producer": ["OpenPDF 1.2.0"], "pages": ["1"]},
//!     "ranges": {"obj_est": [17, 17]}
//! }"#;
//!
//! let store = TemplateStore::load_json([("openpdf/family_1/template.json", json)])
//!     .into_strict()
//!     .expect("template is valid");
//!
//! let template = store.lookup("openpdf", "family_1").expect("template loaded");
//! assert!(template.allowed_values("producer").is_some());
//! assert!(store.lookup("openpdf", "family_2").is_err());
//! ```
mod definition;
mod error;
mod store;
mod template;

pub use crate::definition::TemplateDefinition;
pub use crate::error::{MalformedReason, TemplateError, TemplateLoadErrors};
pub use crate::store::{LoadReport, TemplateStore};
pub use crate::template::{CounterRange, Template, TemplateId};
