//! Local persistence for generated media.
//!
//! Each artifact is written once, whole-buffer, under a timestamped name.

use crate::error::Result;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Filename prefix for generated images.
pub const IMAGE_PREFIX: &str = "gemini-image";

/// Filename prefix for generated videos.
pub const VIDEO_PREFIX: &str = "gemini-video";

/// Writes generated payloads into a single output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `bytes` to `filename` inside the store and return the absolute path.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes).await?;

        let resolved = tokio::fs::canonicalize(&path).await?;
        debug!("Wrote artifact to {}", resolved.display());
        Ok(resolved)
    }
}

/// Build a `<prefix>-<epoch-millis>.<extension>` filename.
pub fn timestamped_filename(prefix: &str, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        prefix,
        Utc::now().timestamp_millis(),
        extension.trim_start_matches('.')
    )
}

/// Format a byte count as megabytes with one decimal place.
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}
