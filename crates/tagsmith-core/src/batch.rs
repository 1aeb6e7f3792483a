//! Batch operations across every record in a directory.
//!
//! These work on the tag files directly, not on an open editor. Locked
//! records are skipped, per-file failures are collected, and nothing is
//! rolled back.

use crate::editor::{can_add, compact};
use crate::store::{is_locked, read_tags, set_locked, write_tags};
use crate::types::{BatchReport, FileRecord, LockStats, TagPair};

/// Rewrite each unlocked record's tags with `edit`.
///
/// `edit` returns `None` when the record needs no change.
fn rewrite_each<F>(records: &mut [FileRecord], mut edit: F) -> BatchReport
where
    F: FnMut(&[String]) -> Option<Vec<String>>,
{
    let mut report = BatchReport::default();

    for record in records.iter_mut() {
        if record.refresh_lock() {
            report.locked_skipped += 1;
            continue;
        }
        let tags = read_tags(&record.tag_path);
        let Some(new_tags) = edit(&tags) else {
            report.skipped += 1;
            continue;
        };
        match write_tags(&record.tag_path, &new_tags) {
            Ok(()) => report.changed.push(record.base_name.clone()),
            Err(e) => {
                tracing::warn!("{e}");
                report.failures.push(format!("{}: {e}", record.base_name));
            }
        }
    }
    report
}

/// Remove every exact occurrence of `tag`.
pub fn bulk_delete(records: &mut [FileRecord], tag: &str) -> BatchReport {
    let target = tag.trim();
    if target.is_empty() {
        return BatchReport::default();
    }
    let report = rewrite_each(records, |tags| {
        tags.iter().any(|t| t == target).then(|| {
            tags.iter()
                .filter(|t| t.as_str() != target)
                .cloned()
                .collect()
        })
    });
    tracing::info!(
        "Deleted '{target}' from {} records ({} without it, {} locked, {} failed)",
        report.processed(),
        report.skipped,
        report.locked_skipped,
        report.failures.len()
    );
    report
}

/// Append `tag` wherever the add policy accepts it.
pub fn bulk_add(records: &mut [FileRecord], tag: &str) -> BatchReport {
    let target = tag.trim();
    if target.is_empty() {
        return BatchReport::default();
    }
    let report = rewrite_each(records, |tags| {
        can_add(tags.iter().map(String::as_str), target).then(|| {
            let mut new_tags = tags.to_vec();
            new_tags.push(target.to_string());
            new_tags
        })
    });
    tracing::info!(
        "Added '{target}' to {} records ({} already had it, {} locked, {} failed)",
        report.processed(),
        report.skipped,
        report.locked_skipped,
        report.failures.len()
    );
    report
}

/// Replace every exact occurrence of `from` with `to`.
///
/// If `to` ends up in the list more than once, only the first stays.
pub fn bulk_replace(records: &mut [FileRecord], from: &str, to: &str) -> BatchReport {
    let from = from.trim();
    let to = to.trim();
    if from.is_empty() || to.is_empty() || from == to {
        return BatchReport::default();
    }
    let report = rewrite_each(records, |tags| {
        if !tags.iter().any(|t| t == from) {
            return None;
        }
        let mut seen_target = false;
        let mut new_tags = Vec::with_capacity(tags.len());
        for tag in tags {
            let tag = if tag == from { to } else { tag.as_str() };
            if tag == to {
                if seen_target {
                    continue;
                }
                seen_target = true;
            }
            new_tags.push(tag.to_string());
        }
        Some(new_tags)
    });
    tracing::info!(
        "Replaced '{from}' with '{to}' in {} records ({} failed)",
        report.processed(),
        report.failures.len()
    );
    report
}

/// Fold plural/singular duplicates in every unlocked tag file.
pub fn compact_all(records: &mut [FileRecord]) -> BatchReport {
    let report = rewrite_each(records, |tags| {
        let pairs: Vec<TagPair> = tags.iter().map(|t| TagPair::new(t.as_str(), "")).collect();
        let compacted = compact(&pairs);
        (compacted != pairs).then(|| compacted.into_iter().map(|p| p.primary).collect())
    });
    tracing::info!(
        "Compacted {} records ({} already compact, {} locked, {} failed)",
        report.processed(),
        report.skipped,
        report.locked_skipped,
        report.failures.len()
    );
    report
}

/// Lock or unlock every record, continuing past failures.
pub fn lock_all(records: &mut [FileRecord], locked: bool) -> BatchReport {
    let mut report = BatchReport::default();
    for record in records.iter_mut() {
        match set_locked(&record.tag_path, locked) {
            Ok(()) => report.changed.push(record.base_name.clone()),
            Err(e) => report.failures.push(format!("{}: {e}", record.base_name)),
        }
        record.refresh_lock();
    }
    tracing::info!(
        "{} {}/{} records",
        if locked { "Locked" } else { "Unlocked" },
        report.processed(),
        records.len()
    );
    report
}

/// Refresh every lock flag and split the records by state.
pub fn lock_stats(records: &mut [FileRecord]) -> LockStats {
    let mut stats = LockStats::default();
    for record in records.iter_mut() {
        if record.refresh_lock() {
            stats.locked.push(record.base_name.clone());
        } else {
            stats.unlocked.push(record.base_name.clone());
        }
    }
    stats
}

/// Records whose sentinel exists right now.
pub fn locked_records(records: &[FileRecord]) -> Vec<&FileRecord> {
    records.iter().filter(|r| is_locked(&r.tag_path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TagsConfig;
    use crate::store::RecordDiscovery;
    use std::path::Path;

    fn setup(files: &[(&str, &str)]) -> (tempfile::TempDir, Vec<FileRecord>) {
        let dir = tempfile::tempdir().unwrap();
        for (name, tags) in files {
            std::fs::write(dir.path().join(format!("{name}.png")), b"").unwrap();
            std::fs::write(dir.path().join(format!("{name}.final.txt")), tags).unwrap();
        }
        let records = RecordDiscovery::from_config(&TagsConfig::default())
            .discover(dir.path())
            .unwrap();
        (dir, records)
    }

    fn tags_of(dir: &Path, name: &str) -> Vec<String> {
        read_tags(&dir.join(format!("{name}.final.txt")))
    }

    #[test]
    fn test_bulk_delete() {
        let (dir, mut records) = setup(&[("a", "x, y"), ("b", "y"), ("c", "x")]);
        set_locked(&records[2].tag_path, true).unwrap();

        let report = bulk_delete(&mut records, " x ");
        assert_eq!(report.changed, vec!["a"]);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.locked_skipped, 1);
        assert_eq!(tags_of(dir.path(), "a"), vec!["y"]);
        assert_eq!(tags_of(dir.path(), "c"), vec!["x"]);
    }

    #[test]
    fn test_bulk_delete_blank_is_noop() {
        let (_dir, mut records) = setup(&[("a", "x")]);
        assert_eq!(bulk_delete(&mut records, "  ").total(), 0);
    }

    #[test]
    fn test_bulk_add_uses_add_policy() {
        let (dir, mut records) = setup(&[("a", "cats"), ("b", "cat"), ("c", "dog")]);

        let report = bulk_add(&mut records, "cats");
        assert_eq!(report.changed, vec!["b", "c"]);
        assert_eq!(report.skipped, 1);
        assert_eq!(tags_of(dir.path(), "b"), vec!["cat", "cats"]);
        assert_eq!(tags_of(dir.path(), "c"), vec!["dog", "cats"]);
    }

    #[test]
    fn test_bulk_replace_dedups_target() {
        let (dir, mut records) = setup(&[("a", "x, y, z"), ("b", "y")]);

        let report = bulk_replace(&mut records, "x", "z");
        assert_eq!(report.changed, vec!["a"]);
        assert_eq!(report.skipped, 1);
        assert_eq!(tags_of(dir.path(), "a"), vec!["z", "y"]);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let (dir, mut records) = setup(&[("a", "x"), ("b", "x")]);
        // A directory in place of a tag file cannot be written
        let broken = dir.path().join("a.final.txt");
        std::fs::remove_file(&broken).unwrap();
        std::fs::create_dir(&broken).unwrap();
        std::fs::write(broken.join("inner"), "x").unwrap();

        let report = bulk_add(&mut records, "new");
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("a:"));
        assert_eq!(report.changed, vec!["b"]);
    }

    #[test]
    fn test_compact_all() {
        let (dir, mut records) = setup(&[("a", "cat, Cat, dogs, dog"), ("b", "x, y")]);

        let report = compact_all(&mut records);
        assert_eq!(report.changed, vec!["a"]);
        assert_eq!(report.skipped, 1);
        assert_eq!(tags_of(dir.path(), "a"), vec!["cat", "dogs"]);
    }

    #[test]
    fn test_lock_all_and_stats() {
        let (dir, mut records) = setup(&[("a", "x"), ("b", "y")]);

        let report = lock_all(&mut records, true);
        assert_eq!(report.processed(), 2);
        assert!(records.iter().all(|r| r.locked));
        assert_eq!(locked_records(&records).len(), 2);

        set_locked(&dir.path().join("b.final.txt"), false).unwrap();
        let stats = lock_stats(&mut records);
        assert_eq!(stats.locked, vec!["a"]);
        assert_eq!(stats.unlocked, vec!["b"]);
        assert!(!records[1].locked);
    }
}
