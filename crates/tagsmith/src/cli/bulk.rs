//! Batch edits across a directory: `bulk` and `compact`.

use clap::{Args, Subcommand};
use tagsmith_core::batch::{bulk_add, bulk_delete, bulk_replace, compact_all};
use tagsmith_core::{BatchReport, Config};

use super::{find_record, run_batch, DirArgs};

/// Arguments for the `bulk` command.
#[derive(Args, Debug)]
pub struct BulkArgs {
    #[command(subcommand)]
    pub command: BulkCommand,
}

/// Batch tag edits. Locked records are skipped.
#[derive(Subcommand, Debug)]
pub enum BulkCommand {
    /// Remove a tag from every record that has it
    Delete {
        #[command(flatten)]
        dir: DirArgs,

        /// Exact tag text to remove
        tag: String,
    },

    /// Add a tag to every record that doesn't have it (or its plural)
    Add {
        #[command(flatten)]
        dir: DirArgs,

        /// Tag text to append
        tag: String,
    },

    /// Replace one tag with another everywhere
    Replace {
        #[command(flatten)]
        dir: DirArgs,

        /// Exact tag text to replace
        from: String,

        /// Replacement tag text
        to: String,
    },
}

/// Arguments for the `compact` command.
#[derive(Args, Debug)]
pub struct CompactArgs {
    #[command(flatten)]
    pub dir: DirArgs,

    /// Base name of the record
    #[arg(required_unless_present = "all")]
    pub name: Option<String>,

    /// Compact every record in the directory
    #[arg(long, conflicts_with = "name")]
    pub all: bool,
}

pub async fn execute(args: BulkArgs, config: &Config) -> anyhow::Result<()> {
    let report = match args.command {
        BulkCommand::Delete { dir, tag } => {
            let mut records = dir.discover(config)?;
            run_batch("Bulk delete", || bulk_delete(&mut records, &tag))
        }
        BulkCommand::Add { dir, tag } => {
            let mut records = dir.discover(config)?;
            run_batch("Bulk add", || bulk_add(&mut records, &tag))
        }
        BulkCommand::Replace { dir, from, to } => {
            let mut records = dir.discover(config)?;
            run_batch("Bulk replace", || bulk_replace(&mut records, &from, &to))
        }
    };
    check_failures(&report)
}

pub async fn execute_compact(args: CompactArgs, config: &Config) -> anyhow::Result<()> {
    let mut records = args.dir.discover(config)?;

    let Some(name) = args.name.as_deref().filter(|_| !args.all) else {
        let report = run_batch("Compact", || compact_all(&mut records));
        return check_failures(&report);
    };

    let record = find_record(&mut records, name)?;
    let report = compact_all(std::slice::from_mut(record));
    if let Some(failure) = report.failures.first() {
        anyhow::bail!("Could not compact {failure}");
    }
    let message = if report.processed() > 0 {
        "Compacted."
    } else if report.locked_skipped > 0 {
        "Record is locked; nothing changed."
    } else {
        "Already compact."
    };
    println!("{message}");
    Ok(())
}

fn check_failures(report: &BatchReport) -> anyhow::Result<()> {
    if report.failures.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} records could not be written", report.failures.len())
    }
}
