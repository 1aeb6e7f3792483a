//! Linear undo/redo history.
//!
//! A list of applied commands plus a cursor. Pushing after an undo drops the
//! undone tail. The history also remembers which cursor position matches the
//! file on disk, which is what "clean" means.

use super::command::Command;
use super::entries::TagEntries;

#[derive(Debug, Clone)]
pub struct History {
    commands: Vec<Command>,
    cursor: usize,
    clean_index: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            cursor: 0,
            clean_index: Some(0),
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `command` and record it at the cursor.
    pub fn push(&mut self, command: Command, entries: &mut TagEntries) {
        command.redo(entries);
        self.commands.truncate(self.cursor);
        if self.clean_index.is_some_and(|clean| clean > self.cursor) {
            // The saved state was in the dropped tail and can't be reached again
            self.clean_index = None;
        }
        self.commands.push(command);
        self.cursor += 1;
    }

    /// Undo the command before the cursor.
    pub fn undo(&mut self, entries: &mut TagEntries) -> Option<&Command> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let command = &self.commands[self.cursor];
        command.undo(entries);
        Some(command)
    }

    /// Redo the command at the cursor.
    pub fn redo(&mut self, entries: &mut TagEntries) -> Option<&Command> {
        let command = self.commands.get(self.cursor)?;
        command.redo(entries);
        self.cursor += 1;
        Some(command)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    pub fn undo_label(&self) -> Option<String> {
        self.cursor
            .checked_sub(1)
            .and_then(|idx| self.commands.get(idx))
            .map(Command::label)
    }

    pub fn redo_label(&self) -> Option<String> {
        self.commands.get(self.cursor).map(Command::label)
    }

    /// Whether the current position matches the saved state.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.cursor)
    }

    /// Mark the current position as saved.
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.cursor);
    }

    /// Drop every command and mark clean.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
