//! Parsing of editor prompt lines.

use std::path::PathBuf;

use tagsmith_core::{ExportScope, Language};

/// One line typed at the editor prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Add a tag typed in either language
    Add(String),
    /// Remove the entry with this id
    Remove(u64),
    /// Set one side of an entry
    Set {
        entry_id: u64,
        field: Language,
        text: String,
    },
    Undo,
    Redo,
    Compact,
    /// Paste comma-separated text, or the copied tags when `None`
    Paste(Option<String>),
    Copy,
    Restore,
    Retranslate,
    Save,
    Lock,
    Unlock,
    Next,
    Prev,
    NextUnlocked,
    /// Open a record by base name
    Open(String),
    /// Change the tag suffix and rescan
    Suffix(String),
    /// Add a tag to every unlocked record
    BulkAdd(String),
    /// Delete a tag from every unlocked record
    BulkDelete(String),
    /// Replace a tag in every unlocked record
    BulkReplace { from: String, to: String },
    /// Compact every unlocked record
    CompactAll,
    /// Lock (`true`) or unlock every record
    LockAll(bool),
    Stats,
    Export { path: PathBuf, scope: ExportScope },
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
  add <tag>            add a tag (English or Chinese)
  rm <id>              remove a tag
  set <id> <text>      change a tag's primary text
  tr <id> <text>       change a tag's translation
  undo | redo          step through history
  compact              fold duplicate and plural tags
  copy                 copy this record's tags
  paste [text]         replace tags with the copied ones, or with text
  restore              go back to the tags the record was opened with
  retranslate          refresh every translation
  save                 write the tag file
  lock | unlock        lock or unlock this record
  next | prev          move between records (saves first)
  next-unlocked        jump to the next unlocked record
  open <name>          open a record by base name
  suffix <suffix>      change the tag file suffix and rescan
  bulk add <tag>       add a tag to every unlocked record
  bulk rm <tag>        delete a tag from every unlocked record
  bulk replace <a> -> <b>
                       replace a tag in every unlocked record
  compact-all          compact every unlocked record
  lock-all | unlock-all
                       lock or unlock every record
  stats                count locked and unlocked records
  export [--locked] <file>
                       write tags as JSON (the open record as edited)
  list                 show the tags again
  quit                 save and exit
";

/// Parse a prompt line. Blank lines give `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "add" | "a" => ReplCommand::Add(required(rest, "add <tag>")?),
        "rm" | "remove" | "del" => ReplCommand::Remove(parse_id(rest)?),
        "set" | "tr" => {
            let (id, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| format!("usage: {word} <id> <text>"))?;
            ReplCommand::Set {
                entry_id: parse_id(id)?,
                field: if word.eq_ignore_ascii_case("tr") {
                    Language::Secondary
                } else {
                    Language::Primary
                },
                text: required(text, &format!("{word} <id> <text>"))?,
            }
        }
        "undo" | "u" => ReplCommand::Undo,
        "redo" | "r" => ReplCommand::Redo,
        "compact" => ReplCommand::Compact,
        "paste" => ReplCommand::Paste((!rest.is_empty()).then(|| rest.to_string())),
        "copy" => ReplCommand::Copy,
        "restore" => ReplCommand::Restore,
        "retranslate" => ReplCommand::Retranslate,
        "save" | "w" => ReplCommand::Save,
        "lock" => ReplCommand::Lock,
        "unlock" => ReplCommand::Unlock,
        "next" | "n" => ReplCommand::Next,
        "prev" | "p" => ReplCommand::Prev,
        "next-unlocked" | "nu" => ReplCommand::NextUnlocked,
        "open" | "o" => ReplCommand::Open(required(rest, "open <name>")?),
        "suffix" => ReplCommand::Suffix(required(rest, "suffix <suffix>")?),
        "bulk" => parse_bulk(rest)?,
        "compact-all" => ReplCommand::CompactAll,
        "lock-all" | "lockall" => ReplCommand::LockAll(true),
        "unlock-all" | "unlockall" => ReplCommand::LockAll(false),
        "stats" => ReplCommand::Stats,
        "export" => parse_export(rest)?,
        "list" | "ls" | "l" => ReplCommand::List,
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_bulk(rest: &str) -> Result<ReplCommand, String> {
    const USAGE: &str = "usage: bulk add|rm <tag> | bulk replace <from> -> <to>";
    let (action, tag) = rest.split_once(char::is_whitespace).ok_or(USAGE)?;
    match action.to_lowercase().as_str() {
        "add" => Ok(ReplCommand::BulkAdd(required(tag, "bulk add <tag>")?)),
        "rm" | "remove" | "del" | "delete" => {
            Ok(ReplCommand::BulkDelete(required(tag, "bulk rm <tag>")?))
        }
        "replace" => {
            let usage = "bulk replace <from> -> <to>";
            let (from, to) = tag
                .split_once("->")
                .ok_or_else(|| format!("usage: {usage}"))?;
            Ok(ReplCommand::BulkReplace {
                from: required(from, usage)?,
                to: required(to, usage)?,
            })
        }
        _ => Err(USAGE.to_string()),
    }
}

fn parse_export(rest: &str) -> Result<ReplCommand, String> {
    let (scope, path) = match rest.strip_prefix("--locked") {
        Some(path) if path.is_empty() || path.starts_with(char::is_whitespace) => {
            (ExportScope::LockedOnly, path)
        }
        _ => (ExportScope::All, rest),
    };
    let path = required(path, "export [--locked] <file>")?;
    Ok(ReplCommand::Export {
        path: PathBuf::from(path),
        scope,
    })
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_id(raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("'{}' is not a tag id", raw.trim()))
}
