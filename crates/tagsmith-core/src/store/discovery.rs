//! Record discovery: pair images with their sidecar tag files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::lock::is_locked;
use crate::config::TagsConfig;
use crate::error::{StorageError, StorageResult};
use crate::types::FileRecord;

/// Clean up a user-entered tag suffix: trim it and make sure it starts with
/// a dot. Blank input gives `None`.
pub fn normalize_suffix(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.starts_with('.') {
        Some(trimmed.to_string())
    } else {
        Some(format!(".{trimmed}"))
    }
}

/// Scans a single directory (non-recursively) for records.
#[derive(Debug, Clone)]
pub struct RecordDiscovery {
    suffix: String,
    image_extensions: Vec<String>,
}

impl RecordDiscovery {
    /// Create a discovery instance for a tag suffix and image extensions.
    pub fn new(suffix: impl Into<String>, image_extensions: &[String]) -> Self {
        Self {
            suffix: suffix.into(),
            image_extensions: image_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Create a discovery instance from the `[tags]` config section.
    pub fn from_config(config: &TagsConfig) -> Self {
        Self::new(config.suffix.clone(), &config.image_extensions)
    }

    /// The same discovery with a different tag suffix.
    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            image_extensions: self.image_extensions.clone(),
        }
    }

    /// The tag suffix this instance matches.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Discover all records in `dir`, sorted by base name.
    ///
    /// Records without a tag file get the expected `<stem><suffix>` path; the
    /// file itself is not created.
    pub fn discover(&self, dir: &Path) -> StorageResult<Vec<FileRecord>> {
        if !dir.is_dir() {
            return Err(StorageError::NotADirectory(dir.to_path_buf()));
        }

        let mut images: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut tag_files: BTreeMap<String, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if self.is_image(path) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    images
                        .entry(stem.to_string())
                        .or_insert_with(|| path.to_path_buf());
                }
            } else if let Some(stem) = self.tag_stem(name) {
                tag_files.insert(stem.to_string(), path.to_path_buf());
            }
        }

        let mut records: BTreeMap<String, FileRecord> = BTreeMap::new();
        for (stem, image_path) in images {
            let tag_path = tag_files
                .remove(&stem)
                .unwrap_or_else(|| dir.join(format!("{stem}{}", self.suffix)));
            records.insert(
                stem.clone(),
                FileRecord {
                    locked: is_locked(&tag_path),
                    base_name: stem,
                    image_path: Some(image_path),
                    tag_path,
                },
            );
        }
        for (stem, tag_path) in tag_files {
            records.insert(
                stem.clone(),
                FileRecord {
                    locked: is_locked(&tag_path),
                    base_name: stem,
                    image_path: None,
                    tag_path,
                },
            );
        }

        tracing::debug!("Discovered {} records in {}", records.len(), dir.display());
        Ok(records.into_values().collect())
    }

    /// Check if a file has a recognized image extension.
    fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.image_extensions.iter().any(|known| *known == ext_lower)
            })
            .unwrap_or(false)
    }

    /// Base name of a tag file, if `name` ends with the suffix.
    fn tag_stem<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_suffix(self.suffix.as_str())
            .filter(|stem| !stem.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::set_locked;

    fn discovery() -> RecordDiscovery {
        RecordDiscovery::from_config(&TagsConfig::default())
    }

    fn touch(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_is_image() {
        let d = discovery();
        assert!(d.is_image(Path::new("a.png")));
        assert!(d.is_image(Path::new("a.JPG")));
        assert!(d.is_image(Path::new("a.webp")));
        assert!(!d.is_image(Path::new("a.final.txt")));
        assert!(!d.is_image(Path::new("a")));
    }

    #[test]
    fn test_pairs_image_and_tag_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "001.png", "");
        touch(dir.path(), "001.final.txt", "a, b, b, c");

        let records = discovery().discover(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.base_name, "001");
        assert_eq!(record.image_path.as_deref(), Some(dir.path().join("001.png").as_path()));
        assert_eq!(record.tag_path, dir.path().join("001.final.txt"));
        assert!(!record.locked);
    }

    #[test]
    fn test_synthesizes_missing_tag_path() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "002.jpg", "");

        let records = discovery().discover(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag_path, dir.path().join("002.final.txt"));
        assert!(!records[0].tag_path.exists());
    }

    #[test]
    fn test_tag_file_without_image() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "003.final.txt", "x");

        let records = discovery().discover(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].image_path.is_none());
    }

    #[test]
    fn test_sorted_and_ignores_side_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.png", "");
        touch(dir.path(), "a.png", "");
        touch(dir.path(), "a.final.txt", "x");
        touch(dir.path(), "a.final.txt.bak", "old");
        touch(dir.path(), "notes.md", "");
        std::fs::create_dir(dir.path().join("c.png")).unwrap();

        let records = discovery().discover(dir.path()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.base_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_lock_flag_from_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "001.png", "");
        touch(dir.path(), "002.png", "");
        set_locked(&dir.path().join("002.final.txt"), true).unwrap();

        let records = discovery().discover(dir.path()).unwrap();
        assert!(!records[0].locked);
        assert!(records[1].locked);
    }

    #[test]
    fn test_custom_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "001.png", "");
        touch(dir.path(), "001.txt", "a");

        let records = RecordDiscovery::new(".txt", &["png".to_string()])
            .discover(dir.path())
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag_path, dir.path().join("001.txt"));
    }

    #[test]
    fn test_normalize_suffix() {
        assert_eq!(normalize_suffix(" txt "), Some(".txt".to_string()));
        assert_eq!(normalize_suffix(".final.txt"), Some(".final.txt".to_string()));
        assert_eq!(normalize_suffix("   "), None);
    }

    #[test]
    fn test_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "file.png", "");

        let err = discovery().discover(&dir.path().join("file.png")).unwrap_err();
        assert!(matches!(err, StorageError::NotADirectory(_)));
    }
}
