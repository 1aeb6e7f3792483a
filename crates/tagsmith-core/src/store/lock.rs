//! Per-record lock sentinels.
//!
//! A record is locked while `<tag_path>.lock` exists. The state is never
//! cached authoritatively: every query goes back to the filesystem.

use std::path::{Path, PathBuf};

use crate::error::{StorageError, StorageResult};

const LOCK_SUFFIX: &str = ".lock";

/// Sentinel path for a tag file.
pub fn lock_path(tag_path: &Path) -> PathBuf {
    super::with_appended(tag_path, LOCK_SUFFIX)
}

/// Whether the record owning `tag_path` is locked right now.
pub fn is_locked(tag_path: &Path) -> bool {
    lock_path(tag_path).exists()
}

/// Create or remove the sentinel. Both directions are idempotent.
pub fn set_locked(tag_path: &Path, locked: bool) -> StorageResult<()> {
    let sentinel = lock_path(tag_path);
    if locked {
        if !sentinel.exists() {
            std::fs::File::create(&sentinel).map_err(|source| StorageError::Lock {
                path: sentinel.clone(),
                source,
            })?;
            tracing::debug!("Locked {}", tag_path.display());
        }
    } else {
        match std::fs::remove_file(&sentinel) {
            Ok(()) => tracing::debug!("Unlocked {}", tag_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StorageError::Unlock {
                    path: sentinel,
                    source,
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let tag_path = dir.path().join("001.final.txt");

        assert!(!is_locked(&tag_path));
        set_locked(&tag_path, true).unwrap();
        assert!(is_locked(&tag_path));
        assert_eq!(std::fs::metadata(lock_path(&tag_path)).unwrap().len(), 0);

        set_locked(&tag_path, false).unwrap();
        assert!(!is_locked(&tag_path));
    }

    #[test]
    fn test_set_locked_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let tag_path = dir.path().join("001.final.txt");

        set_locked(&tag_path, true).unwrap();
        set_locked(&tag_path, true).unwrap();
        assert!(is_locked(&tag_path));

        set_locked(&tag_path, false).unwrap();
        set_locked(&tag_path, false).unwrap();
        assert!(!is_locked(&tag_path));
    }

    #[test]
    fn test_lock_does_not_create_tag_file() {
        let dir = tempfile::tempdir().unwrap();
        let tag_path = dir.path().join("001.final.txt");

        set_locked(&tag_path, true).unwrap();
        assert!(!tag_path.exists());
    }

    #[test]
    fn test_lock_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tag_path = dir.path().join("missing").join("001.final.txt");

        let err = set_locked(&tag_path, true).unwrap_err();
        assert!(matches!(err, StorageError::Lock { .. }));
    }
}
