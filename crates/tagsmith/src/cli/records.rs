//! Read-only commands: `scan`, `show`, and `stats`.

use std::path::Path;

use clap::Args;
use console::Style;
use serde::Serialize;
use tagsmith_core::batch::lock_stats;
use tagsmith_core::store::read_tags;
use tagsmith_core::{Config, FileRecord, Languages, LockStats, TagEditor, TagEntry};

use super::{find_record, translator, DirArgs};

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub dir: DirArgs,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub dir: DirArgs,

    /// Base name of the record
    pub name: String,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `stats` command.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub dir: DirArgs,

    /// Print the lock summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ScanRow<'a> {
    base_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a Path>,
    tag_file: &'a Path,
    tag_file_exists: bool,
    locked: bool,
    tags: usize,
}

impl<'a> ScanRow<'a> {
    fn new(record: &'a FileRecord) -> Self {
        Self {
            base_name: &record.base_name,
            image: record.image_path.as_deref(),
            tag_file: &record.tag_path,
            tag_file_exists: record.tag_path.exists(),
            locked: record.locked,
            tags: read_tags(&record.tag_path).len(),
        }
    }
}

pub async fn execute_scan(args: ScanArgs, config: &Config) -> anyhow::Result<()> {
    let records = args.dir.discover(config)?;
    let rows: Vec<ScanRow> = records.iter().map(ScanRow::new).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!("{}", format_row(row));
    }

    let locked = rows.iter().filter(|r| r.locked).count();
    let dim = Style::new().for_stderr().dim();
    eprintln!(
        "{}",
        dim.apply_to(format!(
            "{} records ({} locked) in {}",
            rows.len(),
            locked,
            args.dir.path().display()
        ))
    );
    Ok(())
}

fn format_row(row: &ScanRow) -> String {
    let tags = if row.tag_file_exists {
        row.tags.to_string()
    } else {
        "-".to_string()
    };
    format!(
        "{:<28} {:>5}  {:<6} {}",
        row.base_name,
        tags,
        if row.locked { "locked" } else { "" },
        if row.image.is_some() { "" } else { "(no image)" }
    )
    .trim_end()
    .to_string()
}

pub async fn execute_show(args: ShowArgs, config: &Config) -> anyhow::Result<()> {
    let mut records = args.dir.discover(config)?;
    let record = find_record(&mut records, &args.name)?.clone();

    let editor = TagEditor::open(record, translator(config), Languages::from_config(config)).await;
    let entries = editor.entries().to_vec();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let dim = Style::new().for_stderr().dim();
    eprintln!(
        "{}",
        dim.apply_to(format!(
            "{}{} via {}",
            editor.record().tag_path.display(),
            if editor.is_locked() { " [locked]" } else { "" },
            editor.translation_chain()
        ))
    );
    print!("{}", render_entries(&entries));
    Ok(())
}

/// One line per entry: id, primary text, and translation.
pub fn render_entries(entries: &[TagEntry]) -> String {
    if entries.is_empty() {
        return "  (no tags)\n".to_string();
    }
    let width = entries
        .iter()
        .map(|e| e.primary.chars().count())
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .map(|e| {
            let pad = width - e.primary.chars().count();
            format!(
                "  {:>3}  {}{}  {}\n",
                e.entry_id,
                e.primary,
                " ".repeat(pad),
                e.secondary
            )
        })
        .collect()
}

pub async fn execute_stats(args: StatsArgs, config: &Config) -> anyhow::Result<()> {
    let mut records = args.dir.discover(config)?;
    let stats = lock_stats(&mut records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print!("{}", format_stats(&stats));
    Ok(())
}

/// Locked and unlocked counts, then the unlocked base names.
pub fn format_stats(stats: &LockStats) -> String {
    let total = stats.locked.len() + stats.unlocked.len();
    let mut out = format!(
        "Locked:   {:>6} / {total}\nUnlocked: {:>6} / {total}\n",
        stats.locked.len(),
        stats.unlocked.len()
    );
    if !stats.unlocked.is_empty() {
        let dim = Style::new().dim();
        out.push_str(&format!(
            "{}\n",
            dim.apply_to(format!("Unlocked: {}", stats.unlocked.join(", ")))
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_entries_aligns_translations() {
        let entries = vec![
            TagEntry::new(1, "cat", "猫"),
            TagEntry::new(12, "red hair", "红发"),
        ];
        let rendered = render_entries(&entries);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "    1  cat       猫");
        assert_eq!(lines[1], "   12  red hair  红发");
    }

    #[test]
    fn test_format_stats() {
        let stats = LockStats {
            locked: vec!["001".to_string()],
            unlocked: vec!["002".to_string(), "003".to_string()],
        };
        let out = format_stats(&stats);
        assert!(out.starts_with("Locked:        1 / 3\nUnlocked:      2 / 3\n"));
        assert!(out.contains("002, 003"));
    }

    #[test]
    fn test_render_no_entries() {
        assert_eq!(render_entries(&[]), "  (no tags)\n");
    }

    #[test]
    fn test_scan_row_counts_tags() {
        let dir = tempfile::tempdir().unwrap();
        let tag_path = dir.path().join("001.final.txt");
        std::fs::write(&tag_path, "a, b, c").unwrap();
        let record = FileRecord {
            base_name: "001".to_string(),
            image_path: None,
            tag_path,
            locked: true,
        };

        let row = ScanRow::new(&record);
        assert_eq!(row.tags, 3);
        assert!(row.tag_file_exists);
        let line = format_row(&row);
        assert!(line.starts_with("001 "));
        assert!(line.contains("    3  locked"));
        assert!(line.ends_with("(no image)"));
    }

    #[test]
    fn test_scan_row_missing_tag_file() {
        let record = FileRecord {
            base_name: "002".to_string(),
            image_path: Some(PathBuf::from("002.png")),
            tag_path: PathBuf::from("/nonexistent/002.final.txt"),
            locked: false,
        };
        let row = ScanRow::new(&record);
        assert_eq!(format_row(&row), format!("{:<28}     -", "002"));
    }
}
