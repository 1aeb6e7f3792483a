//! Tag prediction seam.
//!
//! Model inference is an external collaborator: anything that can turn an
//! image into a comma-separated tag string can generate tag files here.

use std::path::Path;

use async_trait::async_trait;

use crate::error::PredictError;
use crate::store::{is_locked, parse_tag_text, write_tags};
use crate::types::{BatchReport, FileRecord};

/// An opaque image tagger.
#[async_trait]
pub trait TagPredictor: Send + Sync {
    /// Predict tags for an image as a comma-separated string.
    async fn predict(&self, image: &Path) -> Result<String, PredictError>;
}

/// Write predicted tags for records that have an image.
///
/// Records that already have a tag file are skipped unless `overwrite` is
/// set; locked records are always skipped. Failures don't stop the batch.
pub async fn generate_missing(
    records: &[FileRecord],
    predictor: &dyn TagPredictor,
    overwrite: bool,
) -> BatchReport {
    let mut report = BatchReport::default();

    for record in records {
        let Some(image) = record.image_path.as_deref() else {
            report.skipped += 1;
            continue;
        };
        if is_locked(&record.tag_path) {
            report.locked_skipped += 1;
            continue;
        }
        if record.tag_path.exists() && !overwrite {
            report.skipped += 1;
            continue;
        }

        let raw = match predictor.predict(image).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("{e}");
                report.failures.push(format!("{}: {}", record.base_name, e.message));
                continue;
            }
        };
        match write_tags(&record.tag_path, &parse_tag_text(&raw)) {
            Ok(()) => report.changed.push(record.base_name.clone()),
            Err(e) => report.failures.push(format!("{}: {e}", record.base_name)),
        }
    }

    tracing::info!(
        "Generated tags for {} of {} records ({} failed)",
        report.processed(),
        records.len(),
        report.failures.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TagsConfig;
    use crate::store::{read_tags, set_locked, RecordDiscovery};

    /// Tags every image with its own file stem, failing on stems starting with "bad".
    struct StemPredictor;

    #[async_trait]
    impl TagPredictor for StemPredictor {
        async fn predict(&self, image: &Path) -> Result<String, PredictError> {
            let stem = image.file_stem().unwrap().to_string_lossy().into_owned();
            if stem.starts_with("bad") {
                Err(PredictError {
                    path: image.to_path_buf(),
                    message: "model exploded".to_string(),
                })
            } else {
                Ok(format!("{stem}, solo ,  "))
            }
        }
    }

    #[tokio::test]
    async fn test_generate_missing() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "bad.png", "c.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::write(dir.path().join("b.final.txt"), "kept").unwrap();
        std::fs::write(dir.path().join("orphan.final.txt"), "x").unwrap();
        set_locked(&dir.path().join("c.final.txt"), true).unwrap();

        let records = RecordDiscovery::from_config(&TagsConfig::default())
            .discover(dir.path())
            .unwrap();
        let report = generate_missing(&records, &StemPredictor, false).await;

        assert_eq!(report.changed, vec!["a"]);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.locked_skipped, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("bad:"));
        assert_eq!(read_tags(&dir.path().join("a.final.txt")), vec!["a", "solo"]);
        assert_eq!(read_tags(&dir.path().join("b.final.txt")), vec!["kept"]);
    }

    #[tokio::test]
    async fn test_generate_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        std::fs::write(dir.path().join("b.final.txt"), "old").unwrap();

        let records = RecordDiscovery::from_config(&TagsConfig::default())
            .discover(dir.path())
            .unwrap();
        let report = generate_missing(&records, &StemPredictor, true).await;

        assert_eq!(report.changed, vec!["b"]);
        assert_eq!(read_tags(&dir.path().join("b.final.txt")), vec!["b", "solo"]);
    }
}
