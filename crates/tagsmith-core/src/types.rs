//! Core data types shared across the record store and the editor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One base filename's image and sidecar tag file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File stem shared by the image and the tag file
    pub base_name: String,

    /// Image file, if one exists for this stem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,

    /// Tag file path (may not exist yet)
    pub tag_path: PathBuf,

    /// Lock flag as of the last sentinel check
    pub locked: bool,
}

impl FileRecord {
    /// Re-check the lock sentinel and update the cached flag.
    pub fn refresh_lock(&mut self) -> bool {
        self.locked = crate::store::is_locked(&self.tag_path);
        self.locked
    }
}

/// One tag and its translation within an open record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    /// Session-unique identifier; the only key commands use
    pub entry_id: u64,

    /// Tag text in the persisted (primary) language
    pub primary: String,

    /// Display translation in the secondary language
    pub secondary: String,
}

impl TagEntry {
    pub fn new(entry_id: u64, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            entry_id,
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// The `(primary, secondary)` text pair without the id.
    pub fn pair(&self) -> TagPair {
        TagPair::new(self.primary.clone(), self.secondary.clone())
    }
}

/// A `(primary, secondary)` text pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagPair {
    pub primary: String,
    pub secondary: String,
}

impl TagPair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Which side of a bilingual entry a piece of text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// The language written to tag files
    Primary,
    /// The display language
    Secondary,
}

impl Language {
    /// Guess the language of user input.
    ///
    /// Any CJK Unified Ideograph means secondary; everything else is primary.
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)) {
            Language::Secondary
        } else {
            Language::Primary
        }
    }

    /// The other side of the pair.
    pub fn counterpart(self) -> Self {
        match self {
            Language::Primary => Language::Secondary,
            Language::Secondary => Language::Primary,
        }
    }
}

/// Lock summary across a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockStats {
    pub locked: Vec<String>,
    pub unlocked: Vec<String>,
}

/// Outcome of a batch operation over many records.
///
/// Batches never roll back: `failures` lists the records that could not be
/// processed while the rest were.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Base names of the records that were changed
    pub changed: Vec<String>,
    /// Records that needed no change
    pub skipped: usize,
    /// Records left alone because they are locked
    pub locked_skipped: usize,
    /// `base_name: reason` for each failed record
    pub failures: Vec<String>,
}

impl BatchReport {
    /// Number of records that were changed.
    pub fn processed(&self) -> usize {
        self.changed.len()
    }

    /// Total number of records visited.
    pub fn total(&self) -> usize {
        self.processed() + self.skipped + self.locked_skipped + self.failures.len()
    }

    /// Whether `base_name` was changed by the batch.
    pub fn touched(&self, base_name: &str) -> bool {
        self.changed.iter().any(|name| name == base_name)
    }
}
