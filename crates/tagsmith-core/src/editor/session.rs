//! Editing session for one open record.
//!
//! A [`TagEditor`] owns the record's entries and history. Every mutating
//! operation checks the lock sentinel first; a locked record never reaches
//! the history. Translation happens before a command is built, so undo and
//! redo never call out to a translator.

use std::sync::Arc;

use super::command::Command;
use super::entries::TagEntries;
use super::history::History;
use super::normalize::{can_add, collides_on_edit, compact};
use super::EditOutcome;
use crate::config::Config;
use crate::error::{StorageError, StorageResult};
use crate::store::{self, is_single_tag, parse_tag_text, read_tags, write_tags};
use crate::translate::Translator;
use crate::types::{FileRecord, Language, TagEntry, TagPair};

/// Language codes for the two sides of a tag pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    pub primary: String,
    pub secondary: String,
}

impl Default for Languages {
    fn default() -> Self {
        Self {
            primary: "en".to_string(),
            secondary: "zh".to_string(),
        }
    }
}

impl Languages {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary: config.translation.primary_lang.clone(),
            secondary: config.translation.secondary_lang.clone(),
        }
    }

    pub fn code(&self, language: Language) -> &str {
        match language {
            Language::Primary => &self.primary,
            Language::Secondary => &self.secondary,
        }
    }
}

/// The open record: its entries, history, and the tags it was opened with.
pub struct TagEditor {
    record: FileRecord,
    entries: TagEntries,
    history: History,
    initial_tags: Vec<String>,
    translator: Arc<dyn Translator>,
    languages: Languages,
}

impl TagEditor {
    /// Open a record: read its tags and translate them for display.
    pub async fn open(
        mut record: FileRecord,
        translator: Arc<dyn Translator>,
        languages: Languages,
    ) -> Self {
        record.refresh_lock();
        let mut editor = Self {
            record,
            entries: TagEntries::new(),
            history: History::new(),
            initial_tags: Vec::new(),
            translator,
            languages,
        };
        editor.reload().await;
        editor
    }

    /// Re-read the tag file in place, dropping history.
    pub async fn reload(&mut self) {
        let tags = read_tags(&self.record.tag_path);
        let pairs = self.translate_pairs(&tags).await;
        self.entries.replace_all(pairs);
        self.initial_tags = tags;
        self.history.clear();
        self.record.refresh_lock();
        tracing::debug!(
            "Opened {} ({} tags)",
            self.record.base_name,
            self.entries.len()
        );
    }

    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    pub fn entries(&self) -> &TagEntries {
        &self.entries
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn initial_tags(&self) -> &[String] {
        &self.initial_tags
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    /// Whether the record is locked, checked against the filesystem.
    pub fn is_locked(&self) -> bool {
        store::is_locked(&self.record.tag_path)
    }

    /// Whether the entries match what was last loaded or saved.
    pub fn is_clean(&self) -> bool {
        self.history.is_clean()
    }

    pub fn is_dirty(&self) -> bool {
        !self.is_clean()
    }

    pub fn can_undo(&self) -> bool {
        !self.is_locked() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_locked() && self.history.can_redo()
    }

    /// The translation chain for each direction.
    pub fn translation_chain(&self) -> String {
        let Languages { primary, secondary } = &self.languages;
        format!(
            "{primary} -> {secondary}: {}; {secondary} -> {primary}: {}",
            self.translator.describe_chain(primary, secondary),
            self.translator.describe_chain(secondary, primary)
        )
    }

    /// Change one side of an entry; the other side is re-translated.
    pub async fn edit(&mut self, entry_id: u64, field: Language, text: &str) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        let Some(entry) = self.entries.get(entry_id) else {
            return EditOutcome::NotFound;
        };
        let new_text = text.trim().to_string();
        if !is_single_tag(&new_text) {
            return EditOutcome::Separator;
        }
        let old_text = match field {
            Language::Primary => entry.primary.trim(),
            Language::Secondary => entry.secondary.trim(),
        };
        if new_text == old_text {
            return EditOutcome::Unchanged;
        }
        let old = entry.pair();

        let counterpart = self.translate(&new_text, field).await;
        let new = match field {
            Language::Primary => TagPair::new(new_text, counterpart),
            Language::Secondary => TagPair::new(counterpart, new_text),
        };
        if !is_single_tag(&new.primary) {
            return EditOutcome::Separator;
        }

        if collides_on_edit(&self.entries.to_vec(), entry_id, &new.primary) {
            tracing::debug!("Edit to '{}' collides with an existing tag", new.primary);
            return EditOutcome::Duplicate;
        }

        self.history.push(
            Command::Modify { entry_id, old, new },
            &mut self.entries,
        );
        EditOutcome::Applied
    }

    /// Add tags typed in either language.
    ///
    /// Comma- or newline-separated input adds each piece as its own step. The
    /// result is `Applied` if any piece was added, else the first refusal.
    pub async fn add(&mut self, raw: &str) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        let mut result = EditOutcome::NothingToDo;
        for piece in parse_tag_text(raw) {
            let outcome = self.add_one(&piece).await;
            if outcome.is_applied() || result == EditOutcome::NothingToDo {
                result = outcome;
            }
        }
        result
    }

    /// Add one tag: detect its language, translate the counterpart, and
    /// check the add policy before anything is recorded.
    async fn add_one(&mut self, cleaned: &str) -> EditOutcome {
        let language = Language::detect(cleaned);
        let mut counterpart = self.translate(cleaned, language).await;
        if counterpart.is_empty() {
            counterpart = cleaned.to_string();
        }
        let pair = match language {
            Language::Primary => TagPair::new(cleaned, counterpart),
            Language::Secondary => TagPair::new(counterpart, cleaned),
        };
        if !is_single_tag(&pair.primary) {
            return EditOutcome::Separator;
        }

        if !can_add(self.entries.iter().map(|e| e.primary.as_str()), &pair.primary) {
            tracing::debug!("Add of '{}' rejected as duplicate", pair.primary);
            return EditOutcome::Duplicate;
        }

        let entry_id = self.entries.allocate_id();
        let entry = TagEntry::new(entry_id, pair.primary, pair.secondary);
        self.history.push(Command::Add { entry }, &mut self.entries);
        EditOutcome::Applied
    }

    pub fn remove(&mut self, entry_id: u64) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        match Command::remove(&self.entries, entry_id) {
            Some(command) => {
                self.history.push(command, &mut self.entries);
                EditOutcome::Applied
            }
            None => EditOutcome::NotFound,
        }
    }

    /// Replace the whole tag list as one undoable step.
    pub fn replace_all(&mut self, pairs: Vec<TagPair>) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        if pairs.is_empty() {
            return EditOutcome::NothingToDo;
        }
        let command = Command::replace_all(&self.entries, pairs);
        self.history.push(command, &mut self.entries);
        EditOutcome::Applied
    }

    /// Fold plural/singular duplicates as one undoable step.
    pub fn compact(&mut self) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        let current = self.entries.pairs();
        let compacted = compact(&current);
        if compacted == current {
            return EditOutcome::NothingToDo;
        }
        let command = Command::replace_all(&self.entries, compacted);
        self.history.push(command, &mut self.entries);
        EditOutcome::Applied
    }

    /// Non-blank pairs, for pasting into another record.
    pub fn copy(&self) -> Vec<TagPair> {
        self.entries
            .iter()
            .filter(|e| !e.primary.trim().is_empty())
            .map(TagEntry::pair)
            .collect()
    }

    /// Replace the tags with primary-language text (commas or newlines).
    pub async fn paste_text(&mut self, text: &str) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        let tags = parse_tag_text(text);
        if tags.is_empty() {
            return EditOutcome::NothingToDo;
        }
        let pairs = self.translate_pairs(&tags).await;
        self.replace_all(pairs)
    }

    /// Recompute every secondary text from its primary text.
    ///
    /// Secondary text is never saved, so this is not a history step.
    pub async fn retranslate(&mut self) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        if self.entries.is_empty() {
            return EditOutcome::NothingToDo;
        }
        let primaries: Vec<String> = self.entries.iter().map(|e| e.primary.clone()).collect();
        let secondaries = self
            .translator
            .translate_many(
                &primaries,
                &self.languages.primary,
                &self.languages.secondary,
            )
            .await;
        self.entries.set_secondaries(secondaries);
        EditOutcome::Applied
    }

    /// Go back to the tags the record was opened with, dropping history.
    pub async fn restore_initial(&mut self) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        if self.initial_tags.is_empty() {
            return EditOutcome::NothingToDo;
        }
        let tags = self.initial_tags.clone();
        let pairs = self.translate_pairs(&tags).await;
        self.entries.replace_all(pairs);
        self.history.clear();
        EditOutcome::Applied
    }

    pub fn undo(&mut self) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        match self.history.undo(&mut self.entries) {
            Some(_) => EditOutcome::Applied,
            None => EditOutcome::NothingToDo,
        }
    }

    pub fn redo(&mut self) -> EditOutcome {
        if self.is_locked() {
            return EditOutcome::Locked;
        }
        match self.history.redo(&mut self.entries) {
            Some(_) => EditOutcome::Applied,
            None => EditOutcome::NothingToDo,
        }
    }

    /// Write the primary texts to the tag file and mark clean.
    ///
    /// A locked record is never written.
    pub fn save(&mut self) -> StorageResult<()> {
        if self.is_locked() {
            return Err(StorageError::Locked(self.record.tag_path.clone()));
        }
        write_tags(&self.record.tag_path, &self.entries.primaries())?;
        self.history.set_clean();
        tracing::info!("Saved {}", self.record.tag_path.display());
        Ok(())
    }

    /// Lock or unlock the record.
    ///
    /// Locking saves pending edits first; if that fails nothing changes.
    /// A successful lock drops history.
    pub fn set_locked(&mut self, locked: bool) -> StorageResult<()> {
        if locked && self.is_dirty() {
            self.save()?;
        }
        store::set_locked(&self.record.tag_path, locked)?;
        self.sync_lock_state();
        Ok(())
    }

    /// Pick up a lock change made outside the editor.
    pub fn sync_lock_state(&mut self) -> bool {
        let locked = self.record.refresh_lock();
        if locked {
            self.history.clear();
        }
        locked
    }

    async fn translate(&self, text: &str, from: Language) -> String {
        let source = self.languages.code(from);
        let target = self.languages.code(from.counterpart());
        self.translator
            .translate_one(text, source, target)
            .await
            .trim()
            .to_string()
    }

    async fn translate_pairs(&self, tags: &[String]) -> Vec<TagPair> {
        let secondaries = self
            .translator
            .translate_many(tags, &self.languages.primary, &self.languages.secondary)
            .await;
        tags.iter()
            .cloned()
            .zip(secondaries)
            .map(|(primary, secondary)| TagPair::new(primary, secondary))
            .collect()
    }
}
