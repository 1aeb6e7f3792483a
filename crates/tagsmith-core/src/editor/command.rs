//! Reversible edit commands.
//!
//! Each command carries everything it needs to apply itself in either
//! direction. Commands address entries by id only.

use super::entries::{EntriesSnapshot, TagEntries};
use crate::types::{TagEntry, TagPair};

/// One reversible edit of the open record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change both texts of one entry.
    Modify {
        entry_id: u64,
        old: TagPair,
        new: TagPair,
    },

    /// Append a resolved entry.
    Add { entry: TagEntry },

    /// Remove an entry, remembering where it was.
    Remove { entry: TagEntry, index: usize },

    /// Swap the whole list. Redo renumbers from 1; undo restores `old` exactly.
    ReplaceAll {
        old: EntriesSnapshot,
        new: Vec<TagPair>,
    },
}

impl Command {
    /// Capture the current entries and build a replace-all command.
    pub fn replace_all(entries: &TagEntries, new: Vec<TagPair>) -> Self {
        Command::ReplaceAll {
            old: entries.snapshot(),
            new,
        }
    }

    /// Capture an entry and its index for removal.
    pub fn remove(entries: &TagEntries, entry_id: u64) -> Option<Self> {
        let index = entries.position(entry_id)?;
        let entry = entries.get(entry_id)?.clone();
        Some(Command::Remove { entry, index })
    }

    /// Short description for history listings.
    pub fn label(&self) -> String {
        match self {
            Command::Modify { old, new, .. } => {
                format!("modify '{}' -> '{}'", old.primary, new.primary)
            }
            Command::Add { entry } => format!("add '{}'", entry.primary),
            Command::Remove { entry, .. } => format!("remove '{}'", entry.primary),
            Command::ReplaceAll { new, .. } => format!("replace all ({} tags)", new.len()),
        }
    }

    /// Apply the command forward.
    pub fn redo(&self, entries: &mut TagEntries) {
        match self {
            Command::Modify { entry_id, new, .. } => {
                entries.set_texts(*entry_id, new);
            }
            Command::Add { entry } => entries.insert(entry.clone(), None),
            Command::Remove { entry, .. } => {
                entries.remove(entry.entry_id);
            }
            Command::ReplaceAll { new, .. } => entries.replace_all(new.iter().cloned()),
        }
    }

    /// Apply the inverse.
    pub fn undo(&self, entries: &mut TagEntries) {
        match self {
            Command::Modify { entry_id, old, .. } => {
                entries.set_texts(*entry_id, old);
            }
            Command::Add { entry } => {
                entries.remove(entry.entry_id);
            }
            Command::Remove { entry, index } => entries.insert(entry.clone(), Some(*index)),
            Command::ReplaceAll { old, .. } => entries.restore(old),
        }
    }
}
