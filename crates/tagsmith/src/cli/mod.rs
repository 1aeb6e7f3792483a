//! Command handlers for the `tagsmith` binary.

pub mod bulk;
pub mod config;
pub mod edit;
pub mod export;
pub mod lock;
pub mod records;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use tagsmith_core::store::normalize_suffix;
use tagsmith_core::{BatchReport, Config, FileRecord, RecordDiscovery, TranslationManager, Translator};

/// Dataset directory and tag suffix, shared by the commands that scan one.
#[derive(Args, Debug, Clone)]
pub struct DirArgs {
    /// Dataset directory
    pub dir: PathBuf,

    /// Tag file suffix (overrides `tags.suffix` from the config)
    #[arg(long)]
    pub suffix: Option<String>,
}

impl DirArgs {
    /// The directory with `~` expanded.
    pub fn path(&self) -> PathBuf {
        expand_path(&self.dir)
    }

    pub fn discovery(&self, config: &Config) -> RecordDiscovery {
        discovery_for(config, self.suffix.as_deref())
    }

    pub fn discover(&self, config: &Config) -> anyhow::Result<Vec<FileRecord>> {
        let records = self.discovery(config).discover(&self.path())?;
        Ok(records)
    }
}

/// Record discovery from config, with an optional suffix override.
pub fn discovery_for(config: &Config, suffix: Option<&str>) -> RecordDiscovery {
    let discovery = RecordDiscovery::from_config(&config.tags);
    match suffix.and_then(normalize_suffix) {
        Some(suffix) => discovery.with_suffix(suffix),
        None => discovery,
    }
}

pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// The configured translation chain.
pub fn translator(config: &Config) -> Arc<dyn Translator> {
    let manager = TranslationManager::from_config(config);
    let (primary, secondary) = (
        &config.translation.primary_lang,
        &config.translation.secondary_lang,
    );
    tracing::debug!(
        "Translation chain {primary} -> {secondary}: {}; {secondary} -> {primary}: {}",
        manager.describe_chain(primary, secondary),
        manager.describe_chain(secondary, primary)
    );
    Arc::new(manager)
}

/// Find a record by base name.
pub fn find_record<'a>(
    records: &'a mut [FileRecord],
    name: &str,
) -> anyhow::Result<&'a mut FileRecord> {
    records
        .iter_mut()
        .find(|r| r.base_name == name)
        .ok_or_else(|| anyhow::anyhow!("No record named '{name}'"))
}

/// Spinner for work that runs as one call with no per-item progress.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run a batch operation behind a spinner and print its summary.
pub fn run_batch<F>(label: &str, op: F) -> BatchReport
where
    F: FnOnce() -> BatchReport,
{
    let spinner = create_spinner(format!("{label}..."));
    let start = Instant::now();
    let report = op();
    spinner.finish_and_clear();
    eprint!("{}", format_summary(label, &report, start.elapsed()));
    report
}

/// Formatted summary table for a batch report.
pub fn format_summary(label: &str, report: &BatchReport, elapsed: Duration) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("  ====================================\n");
    out.push_str(&format!("  {label:^36}\n"));
    out.push_str("  ====================================\n");
    out.push_str(&format!("    Changed:      {:>8}\n", report.processed()));
    if report.skipped > 0 {
        out.push_str(&format!("    Unchanged:    {:>8}\n", report.skipped));
    }
    if report.locked_skipped > 0 {
        out.push_str(&format!("    Locked:       {:>8}\n", report.locked_skipped));
    }
    if !report.failures.is_empty() {
        out.push_str(&format!("    Failed:       {:>8}\n", report.failures.len()));
    }
    out.push_str("  ------------------------------------\n");
    out.push_str(&format!("    Total:        {:>8}\n", report.total()));
    out.push_str(&format!("    Duration:     {:>7.1}s\n", elapsed.as_secs_f64()));
    out.push_str("  ====================================\n");

    let err = Style::new().for_stderr().red();
    for failure in &report.failures {
        out.push_str(&format!("  {} {failure}\n", err.apply_to("✗")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_only_nonzero_rows() {
        let report = BatchReport {
            changed: vec!["a".to_string(), "b".to_string()],
            skipped: 0,
            locked_skipped: 1,
            failures: Vec::new(),
        };
        let summary = format_summary("Bulk add", &report, Duration::from_millis(1500));

        assert!(summary.contains("Bulk add"));
        assert!(summary.contains("Changed:             2"));
        assert!(summary.contains("Locked:              1"));
        assert!(!summary.contains("Unchanged:"));
        assert!(!summary.contains("Failed:"));
        assert!(summary.contains("Total:               3"));
        assert!(summary.contains("1.5s"));
    }

    #[test]
    fn test_summary_lists_failures() {
        let report = BatchReport {
            failures: vec!["001: permission denied".to_string()],
            ..BatchReport::default()
        };
        let summary = format_summary("Compact", &report, Duration::ZERO);
        assert!(summary.contains("Failed:              1"));
        assert!(summary.contains("001: permission denied"));
    }

    #[test]
    fn test_suffix_override_is_normalized() {
        let config = Config::default();
        assert_eq!(discovery_for(&config, None).suffix(), ".final.txt");
        assert_eq!(discovery_for(&config, Some("txt")).suffix(), ".txt");
        assert_eq!(discovery_for(&config, Some("  ")).suffix(), ".final.txt");
    }

    #[test]
    fn test_find_record() {
        let mut records = vec![FileRecord {
            base_name: "001".to_string(),
            image_path: None,
            tag_path: PathBuf::from("001.final.txt"),
            locked: false,
        }];
        assert!(find_record(&mut records, "001").is_ok());
        assert!(find_record(&mut records, "002").is_err());
    }
}
