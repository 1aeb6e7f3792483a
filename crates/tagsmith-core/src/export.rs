//! JSON export of tags across records.
//!
//! The export maps each base name to its tag list:
//!
//! ```json
//! {
//!   "001": ["red hair", "1girl"],
//!   "002": []
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{StorageError, StorageResult};
use crate::store::{is_locked, read_tags};
use crate::types::FileRecord;

/// Base name to tags, ordered by base name.
pub type TagExport = BTreeMap<String, Vec<String>>;

/// Tags held in memory for the open record, overriding its file.
#[derive(Debug, Clone, Copy)]
pub struct OpenRecord<'a> {
    pub tag_path: &'a Path,
    pub tags: &'a [String],
}

/// Which records to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    #[default]
    All,
    LockedOnly,
}

/// Collect tags for export.
pub fn collect_tags(
    records: &[FileRecord],
    scope: ExportScope,
    open: Option<OpenRecord<'_>>,
) -> TagExport {
    records
        .iter()
        .filter(|r| scope == ExportScope::All || is_locked(&r.tag_path))
        .map(|record| {
            let tags = match open {
                Some(open) if open.tag_path == record.tag_path => open.tags.to_vec(),
                _ => read_tags(&record.tag_path),
            };
            (record.base_name.clone(), tags)
        })
        .collect()
}

/// Render an export as indented UTF-8 JSON.
pub fn to_json(export: &TagExport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(export)
}

/// Write an export file, creating parent directories as needed.
pub fn write_export(path: &Path, export: &TagExport) -> StorageResult<()> {
    let json = to_json(export).map_err(|e| StorageError::Export {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json).map_err(|source| StorageError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Exported {} records to {}", export.len(), path.display());
    Ok(())
}
