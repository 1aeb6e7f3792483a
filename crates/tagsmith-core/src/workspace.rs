//! The working directory: its records, the current position, and the open
//! editor.
//!
//! Anything that leaves the open record (navigation, reloads, batch edits,
//! locking everything) saves pending edits first and stops if that fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::batch;
use crate::config::Config;
use crate::editor::{Languages, TagEditor};
use crate::error::{StorageError, StorageResult};
use crate::export::{collect_tags, write_export, ExportScope, OpenRecord, TagExport};
use crate::predict::{generate_missing, TagPredictor};
use crate::store::{normalize_suffix, RecordDiscovery};
use crate::translate::Translator;
use crate::types::{BatchReport, FileRecord, LockStats};

pub struct Workspace {
    root: Option<PathBuf>,
    discovery: RecordDiscovery,
    records: Vec<FileRecord>,
    current: Option<usize>,
    editor: Option<TagEditor>,
    translator: Arc<dyn Translator>,
    languages: Languages,
}

impl Workspace {
    pub fn new(config: &Config, translator: Arc<dyn Translator>) -> Self {
        Self {
            root: None,
            discovery: RecordDiscovery::from_config(&config.tags),
            records: Vec::new(),
            current: None,
            editor: None,
            translator,
            languages: Languages::from_config(config),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn suffix(&self) -> &str {
        self.discovery.suffix()
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn editor(&self) -> Option<&TagEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut TagEditor> {
        self.editor.as_mut()
    }

    /// Save the open record if it has unsaved, unlocked edits.
    pub fn ensure_saved(&mut self) -> StorageResult<()> {
        if let Some(editor) = self.editor.as_mut() {
            if editor.is_dirty() && !editor.is_locked() {
                editor.save()?;
            }
        }
        Ok(())
    }

    /// Scan `dir` and open the record whose tag file is `select`, or the
    /// first record.
    pub async fn load_directory(&mut self, dir: &Path, select: Option<&Path>) -> StorageResult<()> {
        self.rescan(dir, |record| select == Some(record.tag_path.as_path()))
            .await
    }

    /// Change the tag suffix and rescan, staying on the same base name when
    /// it still exists. Blank input is ignored.
    pub async fn set_tag_suffix(&mut self, suffix: &str) -> StorageResult<bool> {
        let Some(suffix) = normalize_suffix(suffix) else {
            return Ok(false);
        };
        if suffix == self.discovery.suffix() {
            return Ok(false);
        }

        self.ensure_saved()?;
        let discovery = self.discovery.with_suffix(suffix);

        // Scan with the new suffix before switching, so a failed scan leaves
        // the old suffix and records in place
        if let Some(root) = self.root.clone() {
            let base_name = self.editor.as_ref().map(|e| e.record().base_name.clone());
            let records = discovery.discover(&root)?;
            self.discovery = discovery;
            self.install(&root, records, |record| {
                base_name.as_deref() == Some(record.base_name.as_str())
            })
            .await?;
        } else {
            self.discovery = discovery;
        }
        tracing::info!("Tag suffix set to {}", self.discovery.suffix());
        Ok(true)
    }

    async fn rescan<F>(&mut self, dir: &Path, pick: F) -> StorageResult<()>
    where
        F: Fn(&FileRecord) -> bool,
    {
        self.ensure_saved()?;
        let records = self.discovery.discover(dir)?;
        self.install(dir, records, pick).await
    }

    /// Replace the record list and open the picked record (or the first).
    async fn install<F>(
        &mut self,
        dir: &Path,
        records: Vec<FileRecord>,
        pick: F,
    ) -> StorageResult<()>
    where
        F: Fn(&FileRecord) -> bool,
    {
        self.root = Some(dir.to_path_buf());
        self.records = records;
        self.editor = None;
        self.current = None;
        tracing::info!("Loaded {} records from {}", self.records.len(), dir.display());

        if self.records.is_empty() {
            return Ok(());
        }
        let index = self.records.iter().position(pick).unwrap_or(0);
        self.open_index(index).await
    }

    /// Open the record at `index`, saving the current one first.
    pub async fn open_index(&mut self, index: usize) -> StorageResult<()> {
        if index >= self.records.len() {
            return Err(StorageError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        self.ensure_saved()?;

        let editor = TagEditor::open(
            self.records[index].clone(),
            Arc::clone(&self.translator),
            self.languages.clone(),
        )
        .await;
        self.records[index].locked = editor.record().locked;
        self.editor = Some(editor);
        self.current = Some(index);
        Ok(())
    }

    /// Move forward one record. Returns `false` at the end.
    pub async fn open_next(&mut self) -> StorageResult<bool> {
        let next = self.current.map_or(0, |i| i + 1);
        if next >= self.records.len() {
            return Ok(false);
        }
        self.open_index(next).await?;
        Ok(true)
    }

    /// Move back one record. Returns `false` at the start.
    pub async fn open_previous(&mut self) -> StorageResult<bool> {
        match self.current {
            Some(i) if i > 0 => {
                self.open_index(i - 1).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Open the next record after the current one that is not locked.
    pub async fn open_next_unlocked(&mut self) -> StorageResult<bool> {
        let start = self.current.map_or(0, |i| i + 1);
        let found = (start..self.records.len()).find(|&i| !self.records[i].refresh_lock());
        match found {
            Some(index) => {
                self.open_index(index).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flip the open record's lock. Returns the new state, or `None` when
    /// nothing is open.
    pub fn toggle_lock_current(&mut self) -> StorageResult<Option<bool>> {
        let Some(editor) = self.editor.as_ref() else {
            return Ok(None);
        };
        let locked = !editor.is_locked();
        self.set_current_locked(locked)
    }

    pub fn set_current_locked(&mut self, locked: bool) -> StorageResult<Option<bool>> {
        let (Some(editor), Some(index)) = (self.editor.as_mut(), self.current) else {
            return Ok(None);
        };
        editor.set_locked(locked)?;
        let state = editor.record().locked;
        self.records[index].locked = state;
        Ok(Some(state))
    }

    /// Lock or unlock every record.
    pub fn lock_all(&mut self, locked: bool) -> StorageResult<BatchReport> {
        if locked {
            self.ensure_saved()?;
        }
        let report = batch::lock_all(&mut self.records, locked);
        if let Some(editor) = self.editor.as_mut() {
            editor.sync_lock_state();
        }
        Ok(report)
    }

    pub fn lock_stats(&mut self) -> LockStats {
        batch::lock_stats(&mut self.records)
    }

    pub async fn bulk_delete(&mut self, tag: &str) -> StorageResult<BatchReport> {
        self.ensure_saved()?;
        let report = batch::bulk_delete(&mut self.records, tag);
        self.reload_if_touched(&report).await;
        Ok(report)
    }

    pub async fn bulk_add(&mut self, tag: &str) -> StorageResult<BatchReport> {
        self.ensure_saved()?;
        let report = batch::bulk_add(&mut self.records, tag);
        self.reload_if_touched(&report).await;
        Ok(report)
    }

    pub async fn bulk_replace(&mut self, from: &str, to: &str) -> StorageResult<BatchReport> {
        self.ensure_saved()?;
        let report = batch::bulk_replace(&mut self.records, from, to);
        self.reload_if_touched(&report).await;
        Ok(report)
    }

    pub async fn compact_all(&mut self) -> StorageResult<BatchReport> {
        self.ensure_saved()?;
        let report = batch::compact_all(&mut self.records);
        self.reload_if_touched(&report).await;
        Ok(report)
    }

    /// Write predicted tags for records with an image.
    pub async fn generate_missing(
        &mut self,
        predictor: &dyn TagPredictor,
        overwrite: bool,
    ) -> StorageResult<BatchReport> {
        self.ensure_saved()?;
        let report = generate_missing(&self.records, predictor, overwrite).await;
        self.reload_if_touched(&report).await;
        Ok(report)
    }

    /// Tags for export, with the open record taken from memory.
    pub fn collect_export(&self, scope: ExportScope) -> TagExport {
        let open_tags = self.editor.as_ref().map(|e| e.entries().primaries());
        let open = self
            .editor
            .as_ref()
            .zip(open_tags.as_deref())
            .map(|(editor, tags)| OpenRecord {
                tag_path: &editor.record().tag_path,
                tags,
            });
        collect_tags(&self.records, scope, open)
    }

    /// Export to `path`. Returns the number of records written.
    pub fn export(&self, path: &Path, scope: ExportScope) -> StorageResult<usize> {
        let export = self.collect_export(scope);
        write_export(path, &export)?;
        Ok(export.len())
    }

    async fn reload_if_touched(&mut self, report: &BatchReport) {
        if let Some(editor) = self.editor.as_mut() {
            if report.touched(&editor.record().base_name) {
                editor.reload().await;
            }
            editor.sync_lock_state();
        }
    }
}
