//! Provider and translator traits.

use async_trait::async_trait;

/// A single translation backend.
///
/// Providers answer `None` when they can't translate; the manager then moves
/// on to the next provider. Uses `async_trait` because the manager holds
/// providers as `Box<dyn TranslationProvider>`.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Provider name for logging and chain descriptions.
    fn name(&self) -> &str;

    /// Whether the provider can be used at all (e.g. has its data loaded).
    fn is_available(&self) -> bool {
        true
    }

    /// Whether the provider handles this direction at all.
    fn supports(&self, _source: &str, _target: &str) -> bool {
        true
    }

    /// Translate one text.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Option<String>;

    /// Translate several texts. The result has one slot per input.
    async fn translate_many(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Vec<Option<String>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.translate(text, source, target).await);
        }
        out
    }
}

/// What the editor needs from translation.
///
/// Implementations never fail; a text without translation comes back as
/// itself (trimmed).
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_one(&self, text: &str, source: &str, target: &str) -> String;

    async fn translate_many(&self, texts: &[String], source: &str, target: &str) -> Vec<String>;

    /// Human-readable provider chain for one direction, e.g. `"Google -> Dictionary"`.
    fn describe_chain(&self, source: &str, target: &str) -> String;
}
