//! YAML configuration for metaprint.
//!
//! One file describes the global ignore policy, where the template library
//! lives and how the family selector behaves.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "statement checks"
//!
//! ignore:
//!   groups: ["File:System", "ExifTool"]
//!   tags: ["FileModifyDate", "FileAccessDate", "FileInodeChangeDate"]
//!   keys: ["hashes.SHA256", "hashes.MD5"]
//!
//! templates:
//!   dir: "meta_templates"
//!   strict: false
//!
//! selector:
//!   scope: "garanti"
//!   max_closest: 5
//! ```
//!
//! When `ignore` is omitted entirely, [`IgnorePolicy::volatile`] is used.
use std::fs;
use std::path::{Path, PathBuf};

use matcher::SelectorConfig;
use normalize::IgnorePolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetaprintConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Global ignore policy applied before any template sees a record
    #[serde(default = "IgnorePolicy::volatile")]
    pub ignore: IgnorePolicy,

    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub selector: SelectorConfig,
}

impl MetaprintConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: MetaprintConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.ignore
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("ignore: {err}")))?;
        self.templates.validate()?;

        if let Some(scope) = &self.selector.scope {
            if scope.trim().is_empty() {
                return Err(ConfigLoadError::Validation(
                    "selector.scope must not be blank".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The template directory, or [`ConfigLoadError::MissingField`].
    pub fn template_dir(&self) -> Result<&Path, ConfigLoadError> {
        self.templates
            .dir
            .as_deref()
            .ok_or_else(|| ConfigLoadError::MissingField("templates.dir".to_string()))
    }
}

impl Default for MetaprintConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ignore: IgnorePolicy::volatile(),
            templates: TemplatesConfig::default(),
            selector: SelectorConfig::default(),
        }
    }
}

/// Where the template library lives and how load failures are treated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Root of the template tree, walked recursively for `*.json`.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Fail the whole load if any definition is rejected.
    #[serde(default)]
    pub strict: bool,
}

impl TemplatesConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self
            .dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(ConfigLoadError::Validation(
                "templates.dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
ignore:
  groups: ["File:System"]
  keys: ["hashes.SHA256"]
templates:
  dir: "meta_templates"
  strict: true
selector:
  scope: "garanti"
  max_closest: 3
"#;

        let config = MetaprintConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert!(config.ignore.is_ignored("File:System.FileSize"));
        assert!(config.ignore.is_ignored("hashes.SHA256"));
        assert!(!config.ignore.is_ignored("hashes.MD5"));
        assert_eq!(config.template_dir().unwrap(), Path::new("meta_templates"));
        assert!(config.templates.strict);
        assert_eq!(config.selector.scope.as_deref(), Some("garanti"));
        assert_eq!(config.selector.max_closest, 3);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
templates:
  dir: "/srv/templates"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = MetaprintConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.version, "1");
        assert!(!config.templates.strict);
    }

    #[test]
    fn test_omitted_ignore_uses_volatile_policy() {
        let config = MetaprintConfig::from_yaml("version: \"1.0\"\n").unwrap();
        assert_eq!(config.ignore, IgnorePolicy::volatile());
        assert!(config.selector.scope.is_none());
        assert_eq!(config.selector.max_closest, 0);
    }

    #[test]
    fn test_explicit_empty_ignore_is_respected() {
        let config = MetaprintConfig::from_yaml("version: \"1.0\"\nignore: {}\n").unwrap();
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = MetaprintConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(matches!(
            config.template_dir(),
            Err(ConfigLoadError::MissingField(field)) if field == "templates.dir"
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let result = MetaprintConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"));
    }

    #[test]
    fn test_blank_ignore_entry_rejected() {
        let yaml = r#"
version: "1.0"
ignore:
  tags: ["FileName", " "]
"#;
        let err = MetaprintConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("ignore"));
    }

    #[test]
    fn test_blank_scope_rejected() {
        let yaml = r#"
version: "1.0"
selector:
  scope: ""
"#;
        let err = MetaprintConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("selector.scope"));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = MetaprintConfig::from_yaml("version: [unclosed");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = MetaprintConfig {
            name: Some("production".into()),
            templates: TemplatesConfig {
                dir: Some(PathBuf::from("meta_templates")),
                strict: true,
            },
            selector: SelectorConfig::default().with_max_closest(4),
            ..MetaprintConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        let parsed = MetaprintConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
