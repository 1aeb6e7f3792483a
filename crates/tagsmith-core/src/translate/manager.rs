//! Cached provider chain.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::dictionary::DictionaryProvider;
use super::google::GoogleProvider;
use super::libre::LibreTranslateProvider;
use super::provider::{TranslationProvider, Translator};
use crate::config::Config;

type CacheKey = (String, String, String);

/// Runs texts through providers in order, caching every answer.
pub struct TranslationManager {
    providers: Vec<Box<dyn TranslationProvider>>,
    cache: Mutex<HashMap<CacheKey, String>>,
    /// Primary and secondary language; other pairs get no chain.
    languages: Option<(String, String)>,
}

impl TranslationManager {
    pub fn new(providers: Vec<Box<dyn TranslationProvider>>) -> Self {
        Self {
            providers,
            cache: Mutex::new(HashMap::new()),
            languages: None,
        }
    }

    /// Only translate between these two languages (in either direction).
    pub fn with_languages(mut self, primary: &str, secondary: &str) -> Self {
        self.languages = Some((primary.to_string(), secondary.to_string()));
        self
    }

    /// Build the chain named in `translation.providers`, skipping disabled ones.
    pub fn from_config(config: &Config) -> Self {
        let settings = &config.translation;
        let timeout = Duration::from_millis(settings.timeout_ms);
        let mut providers: Vec<Box<dyn TranslationProvider>> = Vec::new();

        for name in &settings.providers {
            match name.as_str() {
                "google" if settings.google.enabled => {
                    providers.push(Box::new(GoogleProvider::new(
                        &settings.google.endpoint,
                        timeout,
                    )));
                }
                "libretranslate" if settings.libretranslate.enabled => {
                    providers.push(Box::new(LibreTranslateProvider::new(
                        &settings.libretranslate.endpoint,
                        timeout,
                    )));
                }
                "dictionary" => {
                    providers.push(Box::new(DictionaryProvider::load(
                        &config.dictionary_path(),
                        &settings.primary_lang,
                        &settings.secondary_lang,
                    )));
                }
                other => tracing::debug!("Translation provider '{other}' disabled"),
            }
        }

        Self::new(providers).with_languages(&settings.primary_lang, &settings.secondary_lang)
    }

    /// A manager with no providers; every text translates to itself.
    pub fn echo() -> Self {
        Self::new(Vec::new())
    }

    /// Providers to try for one direction, in order.
    fn chain(&self, source: &str, target: &str) -> Vec<&dyn TranslationProvider> {
        if let Some((primary, secondary)) = &self.languages {
            let forward = source.starts_with(primary.as_str())
                && target.starts_with(secondary.as_str());
            let backward = source.starts_with(secondary.as_str())
                && target.starts_with(primary.as_str());
            if !forward && !backward {
                return Vec::new();
            }
        }
        self.providers
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| p.is_available() && p.supports(source, target))
            .collect()
    }

    fn cached(&self, key: &CacheKey) -> Option<String> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    fn remember(&self, key: CacheKey, value: String) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, value);
        }
    }

    fn key(text: &str, source: &str, target: &str) -> CacheKey {
        (source.to_string(), target.to_string(), text.trim().to_string())
    }
}

#[async_trait]
impl Translator for TranslationManager {
    async fn translate_one(&self, text: &str, source: &str, target: &str) -> String {
        let key = Self::key(text, source, target);
        if let Some(hit) = self.cached(&key) {
            return hit;
        }
        let result = self
            .translate_many(&[text.to_string()], source, target)
            .await
            .pop()
            .unwrap_or_default();
        self.remember(key, result.clone());
        result
    }

    async fn translate_many(&self, texts: &[String], source: &str, target: &str) -> Vec<String> {
        let mut results: Vec<Option<String>> = vec![None; texts.len()];
        let mut pending: Vec<usize> = Vec::new();

        for (idx, text) in texts.iter().enumerate() {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                results[idx] = Some(String::new());
            } else if let Some(hit) = self.cached(&Self::key(text, source, target)) {
                results[idx] = Some(hit);
            } else {
                pending.push(idx);
            }
        }

        for provider in self.chain(source, target) {
            if pending.is_empty() {
                break;
            }
            let subset: Vec<String> = pending.iter().map(|&i| texts[i].clone()).collect();
            let outputs = provider.translate_many(&subset, source, target).await;

            let mut still_pending = Vec::new();
            for (slot, &idx) in pending.iter().enumerate() {
                match outputs.get(slot).cloned().flatten() {
                    Some(out) if !out.trim().is_empty() => {
                        let cleaned = out.trim().to_string();
                        self.remember(Self::key(&texts[idx], source, target), cleaned.clone());
                        results[idx] = Some(cleaned);
                    }
                    _ => still_pending.push(idx),
                }
            }
            if !still_pending.is_empty() {
                tracing::debug!(
                    "{}: {} of {} texts untranslated ({source} -> {target})",
                    provider.name(),
                    still_pending.len(),
                    pending.len()
                );
            }
            pending = still_pending;
        }

        for idx in pending {
            let trimmed = texts[idx].trim().to_string();
            self.remember(Self::key(&texts[idx], source, target), trimmed.clone());
            results[idx] = Some(trimmed);
        }

        results.into_iter().map(Option::unwrap_or_default).collect()
    }

    fn describe_chain(&self, source: &str, target: &str) -> String {
        let names: Vec<&str> = self
            .chain(source, target)
            .into_iter()
            .map(|p| p.name())
            .collect();
        if names.is_empty() {
            format!("no translators for {source} -> {target}")
        } else {
            names.join(" -> ")
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory provider for tests: answers from a fixed table and counts calls.
    pub(crate) struct FakeProvider {
        name: String,
        table: HashMap<String, String>,
        pub calls: Arc<AtomicUsize>,
    }

    impl FakeProvider {
        pub(crate) fn new(name: &str, entries: &[(&str, &str)]) -> Self {
            Self {
                name: name.to_string(),
                table: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl TranslationProvider for FakeProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn translate(&self, text: &str, _source: &str, _target: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table.get(text.trim()).cloned()
        }
    }

    /// A bilingual manager used across editor tests.
    pub(crate) fn fake_manager(entries: &[(&str, &str)]) -> TranslationManager {
        TranslationManager::new(vec![Box::new(FakeProvider::new("fake", entries))])
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let manager = TranslationManager::new(vec![
            Box::new(FakeProvider::new("first", &[("cat", "猫")])),
            Box::new(FakeProvider::new("second", &[("cat", "喵"), ("dog", "狗")])),
        ]);

        let out = manager
            .translate_many(&["cat".to_string(), "dog".to_string()], "en", "zh")
            .await;
        assert_eq!(out, vec!["猫", "狗"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_echo() {
        let manager = fake_manager(&[]);
        let out = manager.translate_one("  unknown tag ", "en", "zh").await;
        assert_eq!(out, "unknown tag");
    }

    #[tokio::test]
    async fn test_blank_input_is_blank() {
        let manager = fake_manager(&[("cat", "猫")]);
        let out = manager
            .translate_many(&["  ".to_string(), "cat".to_string()], "en", "zh")
            .await;
        assert_eq!(out, vec!["", "猫"]);
    }

    #[tokio::test]
    async fn test_cache_avoids_second_call() {
        let provider = FakeProvider::new("fake", &[("cat", "猫")]);
        let calls = provider.calls.clone();
        let manager = TranslationManager::new(vec![Box::new(provider)]);

        assert_eq!(manager.translate_one("cat", "en", "zh").await, "猫");
        assert_eq!(manager.translate_one(" cat ", "en", "zh").await, "猫");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Different direction is a different cache key
        manager.translate_one("cat", "zh", "en").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_later_provider_only_sees_pending() {
        let second = FakeProvider::new("second", &[("dog", "狗")]);
        let calls = second.calls.clone();
        let manager = TranslationManager::new(vec![
            Box::new(FakeProvider::new("first", &[("cat", "猫")])),
            Box::new(second),
        ]);

        manager
            .translate_many(&["cat".to_string(), "dog".to_string()], "en", "zh")
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_describe_chain() {
        let manager = TranslationManager::new(vec![
            Box::new(FakeProvider::new("Google", &[])),
            Box::new(FakeProvider::new("Dictionary", &[])),
        ]);
        assert_eq!(manager.describe_chain("en", "zh"), "Google -> Dictionary");
        assert_eq!(
            TranslationManager::echo().describe_chain("en", "zh"),
            "no translators for en -> zh"
        );
    }

    #[tokio::test]
    async fn test_chain_follows_direction() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.translation.dictionary_path =
            dir.path().join("dict.json").to_string_lossy().into_owned();
        config.translation.providers = vec!["dictionary".to_string()];
        let manager = TranslationManager::from_config(&config);

        assert_eq!(manager.describe_chain("en", "zh"), "Dictionary");
        assert_eq!(manager.describe_chain("zh", "en"), "Dictionary");
        assert_eq!(manager.describe_chain("en", "ja"), "no translators for en -> ja");

        // A pair outside the configured languages skips every provider
        let manager = fake_manager(&[("cat", "猫")]).with_languages("en", "zh");
        assert_eq!(manager.translate_one("cat", "en", "zh").await, "猫");
        assert_eq!(manager.translate_one("cat", "en", "ja").await, "cat");
    }

    #[test]
    fn test_from_config_respects_order_and_enablement() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.translation.dictionary_path =
            dir.path().join("dict.json").to_string_lossy().into_owned();
        config.translation.providers = vec!["dictionary".to_string(), "google".to_string()];
        config.translation.google.enabled = false;

        let manager = TranslationManager::from_config(&config);
        assert_eq!(manager.describe_chain("en", "zh"), "Dictionary");
    }
}
