//! The `tagsmith edit` command: an interactive prompt over one directory.
//!
//! Every edit goes through the record's history, so `undo`/`redo` work until
//! the record is left, locked, or restored. Moving to another record saves
//! first.

mod command;
mod theme;

use command::{parse, ReplCommand, HELP};

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::Style;
use dialoguer::Input;
use tagsmith_core::{BatchReport, Config, EditOutcome, TagEditor, TagPair, Workspace};

use super::records::{format_stats, render_entries};
use super::{create_spinner, expand_path, format_summary, translator};

/// Arguments for the `edit` command.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Dataset directory (defaults to `general.default_directory`)
    pub dir: Option<PathBuf>,

    /// Tag file suffix (overrides `tags.suffix` from the config)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Base name of the record to open first
    #[arg(long)]
    pub start: Option<String>,
}

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// The open workspace plus the copy buffer, which outlives record changes.
struct Session {
    workspace: Workspace,
    clipboard: Vec<TagPair>,
}

pub async fn execute(args: EditArgs, config: &Config) -> anyhow::Result<()> {
    let dir = args
        .dir
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| config.default_directory());

    let mut workspace = Workspace::new(config, translator(config));
    if let Some(suffix) = args.suffix.as_deref() {
        workspace.set_tag_suffix(suffix).await?;
    }

    let spinner = create_spinner(format!("Loading {}...", dir.display()));
    workspace.load_directory(&dir, None).await?;
    if let Some(name) = args.start.as_deref() {
        let index = workspace
            .records()
            .iter()
            .position(|r| r.base_name == name)
            .ok_or_else(|| anyhow::anyhow!("No record named '{name}'"))?;
        workspace.open_index(index).await?;
    }
    spinner.finish_and_clear();

    if workspace.records().is_empty() {
        eprintln!(
            "No records found in {} (suffix {})",
            dir.display(),
            workspace.suffix()
        );
        return Ok(());
    }

    theme::print_banner(&dir.display().to_string(), workspace.records().len());
    if let Some(editor) = workspace.editor() {
        let dim = Style::new().for_stderr().dim();
        eprintln!("  {}", dim.apply_to(format!("Translation: {}", editor.translation_chain())));
    }

    let mut session = Session {
        workspace,
        clipboard: Vec::new(),
    };
    session.print_current();

    let theme = theme::tagsmith_theme();
    loop {
        let Some(line) = handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt(session.prompt())
                .allow_empty(true)
                .interact_text(),
        )?
        else {
            break;
        };

        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                warn(&message);
                continue;
            }
        };

        match session.run(command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                let err = Style::new().for_stderr().red();
                eprintln!("  {} {e}", err.apply_to("✗"));
            }
        }
    }

    session.workspace.ensure_saved()?;
    Ok(())
}

fn warn(message: &str) {
    let yellow = Style::new().for_stderr().yellow();
    eprintln!("  {}", yellow.apply_to(message));
}

fn info(message: &str) {
    let dim = Style::new().for_stderr().dim();
    eprintln!("  {}", dim.apply_to(message));
}

impl Session {
    fn editor(&mut self) -> anyhow::Result<&mut TagEditor> {
        self.workspace
            .editor_mut()
            .ok_or_else(|| anyhow::anyhow!("No record is open"))
    }

    /// Prompt text: record name, position, and dirty/locked markers.
    fn prompt(&self) -> String {
        let Some(editor) = self.workspace.editor() else {
            return "tagsmith".to_string();
        };
        let position = self.workspace.current_index().map_or(0, |i| i + 1);
        format!(
            "{} [{}/{}]{}{}",
            editor.record().base_name,
            position,
            self.workspace.records().len(),
            if editor.is_locked() { " locked" } else { "" },
            if editor.is_dirty() { " *" } else { "" }
        )
    }

    fn print_current(&self) {
        let Some(editor) = self.workspace.editor() else {
            return;
        };
        let cyan = Style::new().for_stderr().cyan();
        eprintln!();
        eprintln!(
            "  {}{}",
            cyan.apply_to(&editor.record().base_name),
            if editor.is_locked() { " (locked)" } else { "" }
        );
        print!("{}", render_entries(&editor.entries().to_vec()));
    }

    /// Report an editor outcome; show the tags again when something changed.
    fn after_edit(&self, outcome: EditOutcome) {
        if outcome.is_applied() {
            self.print_current();
        } else {
            warn(outcome.message());
        }
    }

    fn after_move(&self, moved: bool, at_edge: &str) {
        if moved {
            self.print_current();
        } else {
            info(at_edge);
        }
    }

    /// Print a batch summary; show the open record again if the batch
    /// changed it.
    fn after_batch(&self, label: &str, report: &BatchReport, start: Instant) {
        eprint!("{}", format_summary(label, report, start.elapsed()));
        let touched = self
            .workspace
            .editor()
            .is_some_and(|e| report.touched(&e.record().base_name));
        if touched {
            self.print_current();
        }
    }

    fn set_locked(&mut self, locked: bool) -> anyhow::Result<()> {
        if let Some(state) = self.workspace.set_current_locked(locked)? {
            info(if state { "Locked." } else { "Unlocked." });
        }
        Ok(())
    }

    async fn run(&mut self, command: ReplCommand) -> anyhow::Result<Flow> {
        match command {
            ReplCommand::Add(text) => {
                let outcome = self.editor()?.add(&text).await;
                self.after_edit(outcome);
            }
            ReplCommand::Remove(entry_id) => {
                let outcome = self.editor()?.remove(entry_id);
                self.after_edit(outcome);
            }
            ReplCommand::Set {
                entry_id,
                field,
                text,
            } => {
                let outcome = self.editor()?.edit(entry_id, field, &text).await;
                self.after_edit(outcome);
            }
            ReplCommand::Undo => {
                let editor = self.editor()?;
                let label = editor.history().undo_label();
                let outcome = editor.undo();
                if let (true, Some(label)) = (outcome.is_applied(), label) {
                    info(&format!("Undid {label}"));
                }
                self.after_edit(outcome);
            }
            ReplCommand::Redo => {
                let editor = self.editor()?;
                let label = editor.history().redo_label();
                let outcome = editor.redo();
                if let (true, Some(label)) = (outcome.is_applied(), label) {
                    info(&format!("Redid {label}"));
                }
                self.after_edit(outcome);
            }
            ReplCommand::Compact => {
                let outcome = self.editor()?.compact();
                self.after_edit(outcome);
            }
            ReplCommand::Paste(Some(text)) => {
                let outcome = self.editor()?.paste_text(&text).await;
                self.after_edit(outcome);
            }
            ReplCommand::Paste(None) => {
                if self.clipboard.is_empty() {
                    warn("Nothing copied yet.");
                } else {
                    let pairs = self.clipboard.clone();
                    let outcome = self.editor()?.replace_all(pairs);
                    self.after_edit(outcome);
                }
            }
            ReplCommand::Copy => {
                self.clipboard = self.editor()?.copy();
                info(&format!("Copied {} tags.", self.clipboard.len()));
            }
            ReplCommand::Restore => {
                let outcome = self.editor()?.restore_initial().await;
                self.after_edit(outcome);
            }
            ReplCommand::Retranslate => {
                let outcome = self.editor()?.retranslate().await;
                self.after_edit(outcome);
            }
            ReplCommand::Save => {
                let editor = self.editor()?;
                if editor.is_locked() {
                    warn(EditOutcome::Locked.message());
                } else {
                    editor.save()?;
                    info("Saved.");
                }
            }
            ReplCommand::Lock => self.set_locked(true)?,
            ReplCommand::Unlock => self.set_locked(false)?,
            ReplCommand::Next => {
                let moved = self.workspace.open_next().await?;
                self.after_move(moved, "Already at the last record.");
            }
            ReplCommand::Prev => {
                let moved = self.workspace.open_previous().await?;
                self.after_move(moved, "Already at the first record.");
            }
            ReplCommand::NextUnlocked => {
                let moved = self.workspace.open_next_unlocked().await?;
                self.after_move(moved, "No unlocked records after this one.");
            }
            ReplCommand::Open(name) => {
                let index = self
                    .workspace
                    .records()
                    .iter()
                    .position(|r| r.base_name == name)
                    .ok_or_else(|| anyhow::anyhow!("No record named '{name}'"))?;
                self.workspace.open_index(index).await?;
                self.print_current();
            }
            ReplCommand::Suffix(suffix) => {
                if self.workspace.set_tag_suffix(&suffix).await? {
                    info(&format!(
                        "Suffix {}: {} records",
                        self.workspace.suffix(),
                        self.workspace.records().len()
                    ));
                    self.print_current();
                } else {
                    info(&format!("Suffix is already {}", self.workspace.suffix()));
                }
            }
            ReplCommand::BulkAdd(tag) => {
                let start = Instant::now();
                let report = self.workspace.bulk_add(&tag).await?;
                self.after_batch(&format!("Bulk add '{tag}'"), &report, start);
            }
            ReplCommand::BulkDelete(tag) => {
                let start = Instant::now();
                let report = self.workspace.bulk_delete(&tag).await?;
                self.after_batch(&format!("Bulk delete '{tag}'"), &report, start);
            }
            ReplCommand::BulkReplace { from, to } => {
                let start = Instant::now();
                let report = self.workspace.bulk_replace(&from, &to).await?;
                self.after_batch(&format!("Replace '{from}' -> '{to}'"), &report, start);
            }
            ReplCommand::CompactAll => {
                let start = Instant::now();
                let report = self.workspace.compact_all().await?;
                self.after_batch("Compact", &report, start);
            }
            ReplCommand::LockAll(locked) => {
                let start = Instant::now();
                let report = self.workspace.lock_all(locked)?;
                self.after_batch(if locked { "Lock all" } else { "Unlock all" }, &report, start);
            }
            ReplCommand::Stats => {
                let stats = self.workspace.lock_stats();
                eprint!("{}", format_stats(&stats));
            }
            ReplCommand::Export { path, scope } => {
                let path = expand_path(&path);
                let count = self.workspace.export(&path, scope)?;
                info(&format!("Exported {count} records to {}", path.display()));
            }
            ReplCommand::List => self.print_current(),
            ReplCommand::Help => eprint!("{HELP}"),
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
