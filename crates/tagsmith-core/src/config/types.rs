//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory opened when none is given
    pub default_directory: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_directory: "~/datasets".to_string(),
        }
    }
}

/// Tag file and discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Suffix appended to an image stem to name its tag file
    pub suffix: String,

    /// Image extensions recognized during discovery (without the dot)
    pub image_extensions: Vec<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            suffix: ".final.txt".to_string(),
            image_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "webp".to_string(),
                "bmp".to_string(),
            ],
        }
    }
}

/// Translation chain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Language code of the tags written to disk
    pub primary_lang: String,

    /// Language code of the display translation
    pub secondary_lang: String,

    /// Provider names in priority order
    pub providers: Vec<String>,

    /// Local `{primary: secondary}` JSON dictionary
    pub dictionary_path: String,

    /// Per-request timeout for HTTP providers in milliseconds
    pub timeout_ms: u64,

    /// Google translate endpoint settings
    pub google: GoogleConfig,

    /// LibreTranslate endpoint settings
    pub libretranslate: LibreTranslateConfig,
}

/// Provider names accepted in `translation.providers`.
pub const KNOWN_PROVIDERS: &[&str] = &["google", "libretranslate", "dictionary"];

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            primary_lang: "en".to_string(),
            secondary_lang: "zh".to_string(),
            providers: KNOWN_PROVIDERS.iter().map(|p| p.to_string()).collect(),
            dictionary_path: "~/.tagsmith/dictionary.json".to_string(),
            timeout_ms: 8000,
            google: GoogleConfig::default(),
            libretranslate: LibreTranslateConfig::default(),
        }
    }
}

/// Google translate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Whether the provider joins the chain
    pub enabled: bool,

    /// `translate_a/single` endpoint
    pub endpoint: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
        }
    }
}

/// LibreTranslate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibreTranslateConfig {
    /// Whether the provider joins the chain
    pub enabled: bool,

    /// `/translate` endpoint
    pub endpoint: String,
}

impl Default for LibreTranslateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://libretranslate.de/translate".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
