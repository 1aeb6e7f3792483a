//! Tagsmith Core - Embeddable tag editing library for image datasets.
//!
//! Tagsmith manages the sidecar tag files that sit next to training images:
//! it finds the records in a directory, edits one record's tags with full
//! undo/redo, keeps a bilingual view of every tag, and guards finished
//! records with lock sentinels.
//!
//! # Architecture
//!
//! ```text
//! Directory → Discover records → Open (read + translate) → Edit ⇄ Undo → Save
//!                                      ↑                                  │
//!                                 lock sentinels ←── batch ops / export ←─┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use tagsmith_core::{Config, TranslationManager, Workspace};
//!
//! #[tokio::main]
//! async fn main() -> tagsmith_core::Result<()> {
//!     let config = Config::load()?;
//!     let translator = Arc::new(TranslationManager::from_config(&config));
//!     let mut workspace = Workspace::new(&config, translator);
//!
//!     workspace.load_directory(Path::new("./dataset"), None).await?;
//!     if let Some(editor) = workspace.editor_mut() {
//!         let _ = editor.add("red hair").await;
//!     }
//!     workspace.ensure_saved()?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod batch;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod predict;
pub mod store;
pub mod translate;
pub mod types;
pub mod workspace;

// Re-exports for convenient access
pub use config::Config;
pub use editor::{EditOutcome, Languages, TagEditor};
pub use error::{ConfigError, PredictError, Result, StorageError, StorageResult, TagsmithError};
pub use export::{ExportScope, TagExport};
pub use predict::TagPredictor;
pub use store::RecordDiscovery;
pub use translate::{TranslationManager, Translator};
pub use types::{BatchReport, FileRecord, Language, LockStats, TagEntry, TagPair};
pub use workspace::Workspace;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
