//! On-disk record store: discovery, sidecar tag files, and lock sentinels.
//!
//! - **discovery**: pair images with their tag files in a directory
//! - **tags**: read/write comma-delimited tag files with a one-time backup
//! - **lock**: per-record `.lock` sentinel files

pub mod discovery;
pub mod lock;
pub mod tags;

pub use discovery::{normalize_suffix, RecordDiscovery};
pub use lock::{is_locked, lock_path, set_locked};
pub use tags::{backup_path, is_single_tag, parse_tag_text, read_tags, write_tags, TAG_SEPARATORS};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Append a raw suffix to a path (`a.txt` + `.bak` -> `a.txt.bak`).
pub(crate) fn with_appended(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
