//! Error types for Tagsmith.
//!
//! Only failures the caller has to decide about are errors. Swallowed reads,
//! translation fallbacks, and rejected edits on locked records are reported
//! through return values instead (see [`crate::editor::EditOutcome`]).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Tagsmith operations.
#[derive(Error, Debug)]
pub enum TagsmithError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tag file, sentinel, or export errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Filesystem errors for tag files, lock sentinels, and exports.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The scanned path is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Could not create the parent directory of a tag file
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a tag file failed
    #[error("Failed to write tags to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating a lock sentinel failed
    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a lock sentinel failed
    #[error("Failed to unlock {path}: {source}")]
    Unlock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an export file failed
    #[error("Failed to export to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record is locked and its tag file must not be written
    #[error("{0} is locked")]
    Locked(PathBuf),

    /// A record index outside the loaded record set
    #[error("Record index {index} out of range ({len} records)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A tag predictor could not produce tags for an image.
#[derive(Error, Debug)]
#[error("Prediction failed for {path}: {message}")]
pub struct PredictError {
    pub path: PathBuf,
    pub message: String,
}

/// Convenience type alias for Tagsmith results.
pub type Result<T> = std::result::Result<T, TagsmithError>;

/// Convenience type alias for storage-specific results.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
