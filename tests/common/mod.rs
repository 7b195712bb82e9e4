//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use metaprint::{MetadataRecord, TemplateStore};

/// The shipped example family.
pub const OPENPDF_FAMILY_1: &str = r#"{
  "bank": "openpdf",
  "family": "family_1",
  "created_at": "2025-12-28T14:55:54+03:00",
  "samples_count": 12,
  "expected": {
    "producer": ["OpenPDF 1.2.0"],
    "pages": ["1"],
    "encrypted": ["False"]
  },
  "ranges": {
    "obj_est": [17, 17],
    "fonts_cnt": [2, 2],
    "xobjects_cnt": null
  },
  "ignore": ["system.FileAccessDate", "hashes"],
  "notes": ""
}"#;

pub const SKIA_FAMILY: &str = r#"{
  "bank": "garanti",
  "family": "family_1",
  "expected": {
    "PDF.Producer": ["Skia/PDF m120", "Skia/PDF m121"],
    "PDF.Creator": ["Chromium"],
    "PDF.PageCount": ["1", "2"]
  },
  "ranges": {"obj_est": [20, 26]}
}"#;

pub const ITEXT_FAMILY: &str = r#"{
  "bank": "garanti",
  "family": "family_2",
  "expected": {
    "PDF.Producer": ["iText 5.5.13"],
    "PDF.PageCount": ["1"]
  },
  "ranges": {"obj_est": [30, 40]}
}"#;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Lay the library out the way the authoring tool does:
/// `<bank>/<family>/template.json`.
pub fn write_library(root: &Path, templates: &[(&str, &str, &str)]) {
    for (bank, family, json) in templates {
        let dir = root.join(bank).join(family);
        fs::create_dir_all(&dir).expect("create template dir");
        fs::write(dir.join("template.json"), json).expect("write template");
    }
}

pub fn library() -> TemplateStore {
    TemplateStore::load_json([
        ("openpdf/family_1/template.json", OPENPDF_FAMILY_1),
        ("garanti/family_1/template.json", SKIA_FAMILY),
        ("garanti/family_2/template.json", ITEXT_FAMILY),
    ])
    .into_strict()
    .expect("fixture library is valid")
}

pub fn openpdf_record() -> MetadataRecord {
    MetadataRecord::new()
        .with_field("producer", "OpenPDF 1.2.0")
        .with_field("pages", "1")
        .with_field("encrypted", "False")
        .with_counter("obj_est", 17)
        .with_counter("fonts_cnt", 2)
}

pub fn skia_record() -> MetadataRecord {
    MetadataRecord::new()
        .with_field("PDF.Producer", "Skia/PDF m121")
        .with_field("PDF.Creator", "Chromium")
        .with_field("PDF.PageCount", "2")
        .with_counter("obj_est", 23)
}
