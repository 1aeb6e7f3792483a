//! Translation between the primary and secondary tag languages.
//!
//! A [`TranslationManager`] runs texts through a chain of providers in
//! priority order (Google, LibreTranslate, a local dictionary) with a cache
//! in front. Nothing here ever fails: when every provider comes up empty the
//! input is echoed back as its own translation.

pub(crate) mod dictionary;
pub(crate) mod google;
pub(crate) mod libre;
pub(crate) mod manager;
pub(crate) mod provider;

pub use dictionary::DictionaryProvider;
pub use google::GoogleProvider;
pub use libre::LibreTranslateProvider;
pub use manager::TranslationManager;
pub use provider::{TranslationProvider, Translator};
