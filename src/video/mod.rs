//! Video generation via long-running Veo operations.
//!
//! A call moves through `Building -> Submitted -> Polling -> {Done, TimedOut, Failed}`.
//! Every failure is converted into an [`Outcome`]; nothing propagates past
//! [`VideoOrchestrator::generate`].

mod orchestrator;
mod outcome;

pub use orchestrator::{VideoOrchestrator, VideoParams};
pub use outcome::Outcome;

use crate::config::Settings;
use crate::error::Result;
use crate::gemini::SeedImage;
use base64::Engine;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Polling cadence and deadline for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Infer a seed image MIME type from the file extension.
pub fn image_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        _ => "image/png",
    }
}

/// Read and encode a seed image.
///
/// A path that does not point at an existing file yields `None`, not an error.
pub async fn load_seed_image(path: Option<&str>) -> Result<Option<SeedImage>> {
    let Some(raw) = path.filter(|p| !p.trim().is_empty()) else {
        return Ok(None);
    };

    let path = Settings::expand_path(raw);
    if !path.is_file() {
        debug!("Seed image {} not found, using text-to-video", path.display());
        return Ok(None);
    }

    let bytes = tokio::fs::read(&path).await?;
    debug!("Loaded seed image {} ({} bytes)", path.display(), bytes.len());

    Ok(Some(SeedImage {
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        mime_type: image_mime_type(&path).to_string(),
    }))
}
