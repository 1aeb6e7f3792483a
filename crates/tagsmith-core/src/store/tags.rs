//! Sidecar tag files.
//!
//! Tags are stored as a single line joined by `", "`. On read, both commas
//! and newlines separate tags so hand-edited files still load.

use std::path::{Path, PathBuf};

use crate::error::{StorageError, StorageResult};

const BACKUP_SUFFIX: &str = ".bak";

/// Characters that separate tags in a tag file.
pub const TAG_SEPARATORS: [char; 2] = [',', '\n'];

/// Whether `text` survives a write and re-read as one tag.
pub fn is_single_tag(text: &str) -> bool {
    !text.contains(TAG_SEPARATORS)
}

/// Backup path for a tag file.
pub fn backup_path(tag_path: &Path) -> PathBuf {
    super::with_appended(tag_path, BACKUP_SUFFIX)
}

/// Split free text into tags: commas and newlines separate, pieces are
/// trimmed, blanks dropped.
pub fn parse_tag_text(text: &str) -> Vec<String> {
    text.split(TAG_SEPARATORS)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the tags of a tag file.
///
/// A missing or unreadable file yields no tags.
pub fn read_tags(path: &Path) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => parse_tag_text(&content),
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Write tags to a tag file, keeping a one-time backup of the original.
///
/// The backup is taken only if the file exists and no backup exists yet, so
/// it always holds the content from before the first write. Backup failures
/// are logged and ignored; the final write is not.
pub fn write_tags<S: AsRef<str>>(path: &Path, tags: &[S]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let backup = backup_path(path);
    if path.exists() && !backup.exists() {
        if let Err(e) = std::fs::copy(path, &backup) {
            tracing::warn!("Failed to back up {}: {e}", path.display());
        }
    }

    let content = tags
        .iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    std::fs::write(path, content).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_text() {
        assert_eq!(
            parse_tag_text(" a, b ,\nc\n\n, ,d"),
            vec!["a", "b", "c", "d"]
        );
        assert!(parse_tag_text("  \n , ").is_empty());
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_tags(&dir.path().join("nope.txt")).is_empty());
    }

    #[test]
    fn test_read_keeps_duplicates_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("001.final.txt");
        std::fs::write(&path, "a, b, b, c").unwrap();

        assert_eq!(read_tags(&path), vec!["a", "b", "b", "c"]);
    }

    #[test]
    fn test_read_unreadable_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as text
        assert!(read_tags(dir.path()).is_empty());
    }

    #[test]
    fn test_write_then_read_strips_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.final.txt");
        write_tags(&path, &["  red hair ", "blue eyes", "   ", "1girl"]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "red hair, blue eyes, 1girl");
        assert_eq!(read_tags(&path), vec!["red hair", "blue eyes", "1girl"]);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("x.final.txt");
        write_tags(&path, &["a"]).unwrap();

        assert_eq!(read_tags(&path), vec!["a"]);
    }

    #[test]
    fn test_backup_is_taken_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.final.txt");
        std::fs::write(&path, "original").unwrap();

        write_tags(&path, &["first"]).unwrap();
        write_tags(&path, &["second"]).unwrap();

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".bak"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(backup_path(&path)).unwrap(), "original");
        assert_eq!(read_tags(&path), vec!["second"]);
    }

    #[test]
    fn test_no_backup_for_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.final.txt");
        write_tags(&path, &["a"]).unwrap();

        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_write_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        // Writing to a directory path fails
        let err = write_tags(dir.path(), &["a"]).unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }
}
