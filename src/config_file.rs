//! YAML configuration file support.
//!
//! Lets callers keep pHash parameters in a file so every producer and
//! consumer of stored digests agrees on them.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "article dedup"
//!
//! phash:
//!   word_hash_bit_size: 6
//!   hit_value_bits: 4
//!   ngram_words: 2
//!   word_hash: djb
//! ```
//!
//! Every field of `phash` is optional and falls back to its default on its
//! own; only the fields present override.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{PHashConfig, PHashError};

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("validation error: {0}")]
    Validation(#[from] PHashError),
}

/// Top-level YAML configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PHashFileConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub phash: PHashConfig,
}

impl PHashFileConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), name = ?config.name, "phash_config_loaded");
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PHashFileConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }
        self.phash.validate()?;
        Ok(())
    }

    pub fn into_config(self) -> PHashConfig {
        self.phash
    }
}

impl Default for PHashFileConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            phash: PHashConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word_hash::WordHashFunction;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
phash:
  word_hash_bit_size: 8
  hit_value_bits: 2
  ngram_words: 3
  word_hash: murmur3
"#;

        let config = PHashFileConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        let cfg = config.into_config();
        assert_eq!(cfg.word_hash_bit_size, 8);
        assert_eq!(cfg.hit_value_bits, 2);
        assert_eq!(cfg.ngram_words, 3);
        assert_eq!(cfg.word_hash, WordHashFunction::Murmur3);
    }

    #[test]
    fn test_partial_section_overrides_per_field() {
        let yaml = r#"
version: "1"
phash:
  ngram_words: 3
"#;

        let cfg = PHashFileConfig::from_yaml(yaml).unwrap().into_config();
        assert_eq!(cfg, PHashConfig::default().with_ngram_words(3));
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = PHashFileConfig::from_yaml("version: \"1.0\"\n").unwrap();
        assert_eq!(config, PHashFileConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1.0"
phash:
  word_hash: fnv1a
  word_hash_bit_size: 8
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PHashFileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.phash.word_hash, WordHashFunction::Fnv1a);
        assert_eq!(config.phash.word_hash_bit_size, 8);
    }

    #[test]
    fn test_missing_file() {
        let result = PHashFileConfig::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let result = PHashFileConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"));
    }

    #[test]
    fn test_phash_validation() {
        let yaml = r#"
version: "1.0"
phash:
  ngram_words: 0
"#;

        let result = PHashFileConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("ngram_words must be >= 1"));
    }

    #[test]
    fn test_unknown_hash_name_is_parse_error() {
        let yaml = r#"
version: "1.0"
phash:
  word_hash: sha1
"#;

        assert!(matches!(
            PHashFileConfig::from_yaml(yaml),
            Err(ConfigLoadError::YamlParse(_))
        ));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = PHashFileConfig {
            name: Some("roundtrip".into()),
            phash: PHashConfig::new().with_word_hash_bit_size(7),
            ..Default::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(PHashFileConfig::from_yaml(&yaml).unwrap(), config);
    }
}
