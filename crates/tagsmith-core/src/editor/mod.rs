//! The tag editor: entries, reversible commands, history, and the
//! duplicate rules that guard them.
//!
//! - **entries**: id-keyed arena of the open record's tags
//! - **command**: Modify / Add / Remove / ReplaceAll with redo and undo
//! - **history**: linear undo stack with a cursor and a clean marker
//! - **normalize**: plural folding, add/edit policies, compaction
//! - **session**: [`TagEditor`], which ties them to a record on disk

pub mod command;
pub mod entries;
pub mod history;
pub mod normalize;
pub mod session;

pub use command::Command;
pub use entries::{EntriesSnapshot, TagEntries};
pub use history::History;
pub use normalize::{can_add, collides_on_edit, compact, is_plural, normalize_tag};
pub use session::{Languages, TagEditor};

/// Result of an editor operation.
///
/// None of these are errors: a locked record or a duplicate tag is something
/// to tell the user about, not something to propagate.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The change was made (and recorded, for history commands)
    Applied,
    /// The new text equals the old text
    Unchanged,
    /// The tag collides with an existing one after normalization
    Duplicate,
    /// The record is locked against edits
    Locked,
    /// No entry with the given id
    NotFound,
    /// Nothing to apply (empty input, nothing to undo, already compact)
    NothingToDo,
    /// The text would split into several tags on save
    Separator,
}

impl EditOutcome {
    pub fn is_applied(self) -> bool {
        self == EditOutcome::Applied
    }

    /// Status line for the user.
    pub fn message(self) -> &'static str {
        match self {
            EditOutcome::Applied => "Done.",
            EditOutcome::Unchanged => "No change.",
            EditOutcome::Duplicate => "Tag already exists (including plural forms), ignored.",
            EditOutcome::Locked => "Record is locked; unlock it to keep editing.",
            EditOutcome::NotFound => "No such tag.",
            EditOutcome::NothingToDo => "Nothing to do.",
            EditOutcome::Separator => "A tag can't contain commas or line breaks.",
        }
    }
}
