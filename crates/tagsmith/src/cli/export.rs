//! The `export` command.

use std::path::PathBuf;

use clap::Args;
use tagsmith_core::export::{collect_tags, write_export};
use tagsmith_core::{Config, ExportScope};

use super::{expand_path, DirArgs};

/// Arguments for the `export` command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub dir: DirArgs,

    /// Output JSON file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Export only locked records
    #[arg(long)]
    pub locked: bool,
}

impl ExportArgs {
    fn scope(&self) -> ExportScope {
        if self.locked {
            ExportScope::LockedOnly
        } else {
            ExportScope::All
        }
    }
}

pub async fn execute(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let records = args.dir.discover(config)?;
    let export = collect_tags(&records, args.scope(), None);
    let output = expand_path(&args.output);

    write_export(&output, &export)?;
    println!("Exported {} records to {}", export.len(), output.display());
    Ok(())
}
