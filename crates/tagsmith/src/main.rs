//! Tagsmith CLI - Review and batch-edit the tag files of an image dataset.
//!
//! Each image in a dataset directory has a sidecar tag file
//! (`001.png` + `001.final.txt`). Tagsmith edits those files with undo/redo,
//! shows each tag next to its translation, and locks records once they are
//! reviewed so nothing changes them by accident.
//!
//! # Usage
//!
//! ```bash
//! # List records and their lock state
//! tagsmith scan ./dataset
//!
//! # Edit interactively
//! tagsmith edit ./dataset
//!
//! # Batch edits (locked records are skipped)
//! tagsmith bulk replace ./dataset "cats" "cat"
//!
//! # Export reviewed tags
//! tagsmith export ./dataset -o tags.json --locked
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Tagsmith - Review and batch-edit the tag files of an image dataset.
#[derive(Parser, Debug)]
#[command(name = "tagsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the records in a directory
    Scan(cli::records::ScanArgs),

    /// Print one record's tags with translations
    Show(cli::records::ShowArgs),

    /// Edit a directory interactively
    Edit(cli::edit::EditArgs),

    /// Lock a record (or all of them) against edits
    Lock(cli::lock::LockArgs),

    /// Unlock a record (or all of them)
    Unlock(cli::lock::LockArgs),

    /// Count locked and unlocked records
    Stats(cli::records::StatsArgs),

    /// Export tags as JSON
    Export(cli::export::ExportArgs),

    /// Add, delete, or replace a tag across every record
    Bulk(cli::bulk::BulkArgs),

    /// Fold duplicate and plural tags
    Compact(cli::bulk::CompactArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match tagsmith_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tagsmith config path`."
            );
            tagsmith_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Tagsmith v{}", tagsmith_core::VERSION);

    match cli.command {
        Commands::Scan(args) => cli::records::execute_scan(args, &config).await,
        Commands::Show(args) => cli::records::execute_show(args, &config).await,
        Commands::Edit(args) => cli::edit::execute(args, &config).await,
        Commands::Lock(args) => cli::lock::execute(args, &config, true).await,
        Commands::Unlock(args) => cli::lock::execute(args, &config, false).await,
        Commands::Stats(args) => cli::records::execute_stats(args, &config).await,
        Commands::Export(args) => cli::export::execute(args, &config).await,
        Commands::Bulk(args) => cli::bulk::execute(args, &config).await,
        Commands::Compact(args) => cli::bulk::execute_compact(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bulk_replace() {
        let cli = Cli::try_parse_from(["tagsmith", "bulk", "replace", "./data", "cats", "cat"]).unwrap();
        let Commands::Bulk(args) = cli.command else {
            panic!("expected bulk");
        };
        let cli::bulk::BulkCommand::Replace { dir, from, to } = args.command else {
            panic!("expected replace");
        };
        assert_eq!(dir.dir, std::path::PathBuf::from("./data"));
        assert_eq!((from.as_str(), to.as_str()), ("cats", "cat"));
    }

    #[test]
    fn test_lock_needs_name_or_all() {
        assert!(Cli::try_parse_from(["tagsmith", "lock", "./data"]).is_err());
        assert!(Cli::try_parse_from(["tagsmith", "lock", "./data", "001"]).is_ok());
        assert!(Cli::try_parse_from(["tagsmith", "lock", "./data", "--all"]).is_ok());
        assert!(Cli::try_parse_from(["tagsmith", "lock", "./data", "001", "--all"]).is_err());
    }

    #[test]
    fn test_global_flags_and_suffix() {
        let cli =
            Cli::try_parse_from(["tagsmith", "scan", "./data", "--suffix", "txt", "-v"]).unwrap();
        assert!(cli.verbose);
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.dir.suffix.as_deref(), Some("txt"));
    }

    #[test]
    fn test_edit_dir_is_optional() {
        let cli = Cli::try_parse_from(["tagsmith", "edit"]).unwrap();
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert!(args.dir.is_none());
    }
}
