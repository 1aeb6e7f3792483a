//! Local JSON dictionary provider.
//!
//! The dictionary maps primary-language tags to their secondary-language
//! text. Lookups in the other direction use the reversed map.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use super::provider::TranslationProvider;

pub struct DictionaryProvider {
    primary_lang: String,
    secondary_lang: String,
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl DictionaryProvider {
    pub fn new(mapping: HashMap<String, String>, primary_lang: &str, secondary_lang: &str) -> Self {
        let reverse = mapping
            .iter()
            .map(|(k, v)| (v.clone(), k.clone()))
            .collect();
        Self {
            primary_lang: primary_lang.to_string(),
            secondary_lang: secondary_lang.to_string(),
            forward: mapping,
            reverse,
        }
    }

    /// Load the dictionary at `path`.
    ///
    /// A missing or unparseable file is replaced with `{}` so the user has a
    /// file to fill in. Failing that, the dictionary is just empty.
    pub fn load(path: &Path, primary_lang: &str, secondary_lang: &str) -> Self {
        let mapping = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(mapping) => mapping,
                Err(e) => {
                    tracing::warn!("Dictionary {} is not valid JSON ({e}), resetting", path.display());
                    reset(path);
                    HashMap::new()
                }
            },
            Err(_) => {
                reset(path);
                HashMap::new()
            }
        };
        tracing::debug!("Loaded {} dictionary entries from {}", mapping.len(), path.display());
        Self::new(mapping, primary_lang, secondary_lang)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The map for a direction, or `None` for a pair this dictionary doesn't cover.
    fn table(&self, source: &str, target: &str) -> Option<&HashMap<String, String>> {
        if source.starts_with(&self.primary_lang) && target.starts_with(&self.secondary_lang) {
            Some(&self.forward)
        } else if source.starts_with(&self.secondary_lang) && target.starts_with(&self.primary_lang)
        {
            Some(&self.reverse)
        } else {
            None
        }
    }
}

fn reset(path: &Path) {
    let result = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(path, "{}"));
    if let Err(e) = result {
        tracing::warn!("Failed to create dictionary {}: {e}", path.display());
    }
}

#[async_trait]
impl TranslationProvider for DictionaryProvider {
    fn name(&self) -> &str {
        "Dictionary"
    }

    fn supports(&self, source: &str, target: &str) -> bool {
        self.table(source, target).is_some()
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Option<String> {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return Some(String::new());
        }
        self.table(source, target)?.get(cleaned).cloned()
    }
}
