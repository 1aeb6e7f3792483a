//! The `lock` and `unlock` commands.

use clap::Args;
use tagsmith_core::batch::lock_all;
use tagsmith_core::store::set_locked;
use tagsmith_core::Config;

use super::{find_record, run_batch, DirArgs};

/// Arguments for `lock` and `unlock`.
#[derive(Args, Debug)]
pub struct LockArgs {
    #[command(flatten)]
    pub dir: DirArgs,

    /// Base name of the record
    #[arg(required_unless_present = "all")]
    pub name: Option<String>,

    /// Apply to every record in the directory
    #[arg(long, conflicts_with = "name")]
    pub all: bool,
}

/// Lock (`locked = true`) or unlock the named record, or all of them.
pub async fn execute(args: LockArgs, config: &Config, locked: bool) -> anyhow::Result<()> {
    let mut records = args.dir.discover(config)?;
    let verb = if locked { "Locked" } else { "Unlocked" };

    if args.all {
        let label = if locked { "Lock all" } else { "Unlock all" };
        let report = run_batch(label, || lock_all(&mut records, locked));
        if !report.failures.is_empty() {
            anyhow::bail!("{} records could not be changed", report.failures.len());
        }
        return Ok(());
    }

    let Some(name) = args.name.as_deref() else {
        anyhow::bail!("Give a record name or --all");
    };
    let record = find_record(&mut records, name)?;
    set_locked(&record.tag_path, locked)?;
    println!("{verb} {}", record.base_name);
    Ok(())
}
