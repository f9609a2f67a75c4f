//! Configuration for redis-compat.
//!
//! Read from TOML. Lookup order: an explicit path, `./redis-compat.toml`,
//! then `<config dir>/redis-compat/config.toml`. A missing file means
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const LOCAL_CONFIG: &str = "redis-compat.toml";

/// How raw byte replies are turned into strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringEncoding {
    /// UTF-8, invalid sequences replaced with U+FFFD.
    #[default]
    Utf8Lossy,
    /// UTF-8, invalid sequences rejected.
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

/// Guard applied to a missing `LINSERT` position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionCheck {
    /// A missing position is an invalid argument.
    #[default]
    Strict,
    /// A missing position is treated as `BEFORE`.
    Lenient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    pub string_encoding: StringEncoding,
    pub list_position_check: PositionCheck,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CompatConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from `path`, or from the default locations when
    /// `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_paths().into_iter().find(|p| p.exists()) {
                Some(found) => Self::load_file(&found),
                None => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config");
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("redis-compat").join("config.toml"));
        }
        paths
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = CompatConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompatConfig::default());
        assert_eq!(config.string_encoding, StringEncoding::Utf8Lossy);
        assert_eq!(config.list_position_check, PositionCheck::Strict);
    }

    #[test]
    fn test_parse_all_fields() {
        let config = CompatConfig::from_toml_str(
            "string_encoding = \"latin1\"\nlist_position_check = \"lenient\"\n",
        )
        .unwrap();
        assert_eq!(config.string_encoding, StringEncoding::Latin1);
        assert_eq!(config.list_position_check, PositionCheck::Lenient);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        assert!(CompatConfig::from_toml_str("string_encoding = \"ebcdic\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = CompatConfig::load(Some(Path::new("/nonexistent/redis-compat.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let text = CompatConfig::default().to_toml_string().unwrap();
        assert!(text.contains("string_encoding = \"utf8_lossy\""));
        assert_eq!(CompatConfig::from_toml_str(&text).unwrap(), CompatConfig::default());
    }
}
