//! Configuration management for Tagsmith.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Tagsmith.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Tag file and discovery settings
    pub tags: TagsConfig,

    /// Translation chain settings
    pub translation: TranslationConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.tagsmith.tagsmith/config.toml
    /// - Linux: ~/.config/tagsmith/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\tagsmith\config\config.toml
    ///
    /// Falls back to ~/.tagsmith/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagsmith", "tagsmith")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".tagsmith").join("config.toml")
            })
    }

    /// Resolved default dataset directory (with ~ expansion).
    pub fn default_directory(&self) -> PathBuf {
        expand(&self.general.default_directory)
    }

    /// Resolved local dictionary path (with ~ expansion).
    pub fn dictionary_path(&self) -> PathBuf {
        expand(&self.translation.dictionary_path)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tags.suffix, ".final.txt");
        assert_eq!(config.translation.primary_lang, "en");
        assert_eq!(config.translation.secondary_lang, "zh");
        assert_eq!(config.translation.timeout_ms, 8000);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[tags]"));
        assert!(toml.contains("[translation]"));
        assert!(toml.contains("[logging]"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[tags]\nsuffix = \".txt\"\n").unwrap();
        assert_eq!(config.tags.suffix, ".txt");
        assert!(config.tags.image_extensions.contains(&"png".to_string()));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tags]\nsuffix = \"\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("tags.suffix"));
    }

    #[test]
    fn test_from_toml_str_parse_error() {
        let err = Config::from_toml_str("[tags\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_absolute_paths_pass_through() {
        let mut config = Config::default();
        config.translation.dictionary_path = "/tmp/dict.json".to_string();
        assert_eq!(config.dictionary_path(), PathBuf::from("/tmp/dict.json"));
    }
}
