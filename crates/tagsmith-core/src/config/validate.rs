//! Configuration validation.

use crate::error::ConfigError;

use super::{Config, KNOWN_PROVIDERS};

impl Config {
    /// Validate configuration values are usable.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.tags.suffix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "tags.suffix must not be empty".into(),
            ));
        }
        if self.tags.image_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "tags.image_extensions must list at least one extension".into(),
            ));
        }
        let primary = self.translation.primary_lang.trim();
        let secondary = self.translation.secondary_lang.trim();
        if primary.is_empty() || secondary.is_empty() {
            return Err(ConfigError::ValidationError(
                "translation.primary_lang and translation.secondary_lang must be set".into(),
            ));
        }
        if primary.eq_ignore_ascii_case(secondary) {
            return Err(ConfigError::ValidationError(
                "translation.primary_lang and translation.secondary_lang must differ".into(),
            ));
        }
        if self.translation.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "translation.timeout_ms must be > 0".into(),
            ));
        }
        if let Some(unknown) = self
            .translation
            .providers
            .iter()
            .find(|p| !KNOWN_PROVIDERS.contains(&p.as_str()))
        {
            return Err(ConfigError::ValidationError(format!(
                "translation.providers: unknown provider '{unknown}' (expected one of {})",
                KNOWN_PROVIDERS.join(", ")
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_suffix() {
        let mut config = Config::default();
        config.tags.suffix = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tags.suffix"));
    }

    #[test]
    fn test_validate_rejects_no_image_extensions() {
        let mut config = Config::default();
        config.tags.image_extensions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("image_extensions"));
    }

    #[test]
    fn test_validate_rejects_same_languages() {
        let mut config = Config::default();
        config.translation.secondary_lang = "EN".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.translation.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = Config::default();
        config.translation.providers.push("babelfish".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("babelfish"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
