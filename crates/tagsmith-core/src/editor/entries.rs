//! In-memory tag entries for the open record.
//!
//! Entries live in an id-keyed arena with a separate display order, so
//! commands can find an entry by id no matter how the list was reordered.

use std::collections::HashMap;

use crate::types::{TagEntry, TagPair};

/// The open record's ordered entries plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntries {
    order: Vec<u64>,
    arena: HashMap<u64, TagEntry>,
    next_id: u64,
}

/// Exact copy of the entries and the id counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntriesSnapshot {
    entries: Vec<TagEntry>,
    next_id: u64,
}

impl Default for TagEntries {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            arena: HashMap::new(),
            next_id: 1,
        }
    }
}

impl TagEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build entries numbered from 1.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = TagPair>,
    {
        let mut entries = Self::new();
        entries.replace_all(pairs);
        entries
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> + '_ {
        self.order.iter().filter_map(|id| self.arena.get(id))
    }

    pub fn to_vec(&self) -> Vec<TagEntry> {
        self.iter().cloned().collect()
    }

    pub fn pairs(&self) -> Vec<TagPair> {
        self.iter().map(TagEntry::pair).collect()
    }

    /// Non-blank primary texts, as written to the tag file.
    pub fn primaries(&self) -> Vec<String> {
        self.iter()
            .map(|e| e.primary.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn get(&self, entry_id: u64) -> Option<&TagEntry> {
        self.arena.get(&entry_id)
    }

    /// Display index of an entry.
    pub fn position(&self, entry_id: u64) -> Option<usize> {
        self.order.iter().position(|id| *id == entry_id)
    }

    /// The id the next allocation will return.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Hand out a fresh id. Ids are never handed out twice.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an entry with its existing id, at `index` or at the end.
    ///
    /// An index past the end appends.
    pub fn insert(&mut self, entry: TagEntry, index: Option<usize>) {
        let id = entry.entry_id;
        if self.arena.insert(id, entry).is_some() {
            self.order.retain(|existing| *existing != id);
        }
        let at = index.unwrap_or(self.order.len()).min(self.order.len());
        self.order.insert(at, id);
        self.next_id = self.next_id.max(id + 1);
    }

    /// Remove an entry, returning its former index and value.
    pub fn remove(&mut self, entry_id: u64) -> Option<(usize, TagEntry)> {
        let index = self.position(entry_id)?;
        self.order.remove(index);
        self.arena.remove(&entry_id).map(|entry| (index, entry))
    }

    /// Overwrite both texts of an entry. Returns false if the id is unknown.
    pub fn set_texts(&mut self, entry_id: u64, pair: &TagPair) -> bool {
        match self.arena.get_mut(&entry_id) {
            Some(entry) => {
                entry.primary = pair.primary.clone();
                entry.secondary = pair.secondary.clone();
                true
            }
            None => false,
        }
    }

    /// Overwrite the secondary text of every entry, in display order.
    pub fn set_secondaries<I>(&mut self, secondaries: I)
    where
        I: IntoIterator<Item = String>,
    {
        for (id, secondary) in self.order.iter().zip(secondaries) {
            if let Some(entry) = self.arena.get_mut(id) {
                entry.secondary = secondary;
            }
        }
    }

    /// Replace everything, numbering ids from 1 and resetting the counter.
    pub fn replace_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = TagPair>,
    {
        self.order.clear();
        self.arena.clear();
        for (idx, pair) in pairs.into_iter().enumerate() {
            let id = idx as u64 + 1;
            self.order.push(id);
            self.arena
                .insert(id, TagEntry::new(id, pair.primary, pair.secondary));
        }
        self.next_id = self.order.len() as u64 + 1;
    }

    pub fn snapshot(&self) -> EntriesSnapshot {
        EntriesSnapshot {
            entries: self.to_vec(),
            next_id: self.next_id,
        }
    }

    /// Restore a snapshot exactly, ids and counter included.
    pub fn restore(&mut self, snapshot: &EntriesSnapshot) {
        self.order = snapshot.entries.iter().map(|e| e.entry_id).collect();
        self.arena = snapshot
            .entries
            .iter()
            .map(|e| (e.entry_id, e.clone()))
            .collect();
        self.next_id = snapshot.next_id;
    }
}

impl EntriesSnapshot {
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    pub fn pairs(&self) -> Vec<TagPair> {
        self.entries.iter().map(TagEntry::pair).collect()
    }
}
