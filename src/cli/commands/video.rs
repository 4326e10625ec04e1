//! Video command implementation.

use crate::artifact::ArtifactStore;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::gemini::{ClientConfig, GeminiClient};
use crate::video::{Outcome, VideoOrchestrator, VideoParams};
use anyhow::Result;
use std::sync::Arc;

/// Run the video command.
pub async fn run_video(
    prompt: &str,
    aspect_ratio: Option<String>,
    model: Option<String>,
    image: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check_api_key(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'mediagen doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let client = Arc::new(GeminiClient::new(ClientConfig::from_settings(&settings))?);
    let orchestrator = VideoOrchestrator::new(
        client,
        ArtifactStore::new(settings.output_dir()),
        settings.poll_policy(),
    );

    let params = VideoParams {
        prompt: prompt.to_string(),
        aspect_ratio: aspect_ratio.unwrap_or_else(|| settings.video.aspect_ratio.clone()),
        model: model.unwrap_or_else(|| settings.video.model.clone()),
        image_path: image,
    };

    let spinner = Output::spinner(&format!(
        "Generating video with {} (up to {}s)...",
        params.model,
        orchestrator.policy().timeout.as_secs()
    ));
    let outcome = orchestrator.generate(&params).await;
    spinner.finish_and_clear();

    println!("{}", outcome.to_json());

    match outcome {
        Outcome::Success { file, .. } => {
            Output::success(&format!("Saved {}", file.display()));
            Ok(())
        }
        Outcome::TimedOut { operation_name, .. } => {
            anyhow::bail!("Timed out waiting for operation {}", operation_name)
        }
        Outcome::EmptyResult { .. } => {
            anyhow::bail!("The operation finished without a video")
        }
        Outcome::Failure { reason } => anyhow::bail!(reason),
    }
}
