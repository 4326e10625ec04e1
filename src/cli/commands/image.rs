//! Image command implementation.

use crate::artifact::ArtifactStore;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::gemini::{ClientConfig, GeminiClient};
use crate::image::{ImageGenerator, ImageOutcome, ImageParams};
use anyhow::Result;
use std::sync::Arc;

/// Run the image command.
pub async fn run_image(
    prompt: &str,
    aspect_ratio: Option<String>,
    format: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check_api_key(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'mediagen doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let client = Arc::new(GeminiClient::new(ClientConfig::from_settings(&settings))?);
    let generator = ImageGenerator::new(
        client,
        ArtifactStore::new(settings.output_dir()),
        &settings.image.model,
    );

    let params = ImageParams {
        prompt: prompt.to_string(),
        aspect_ratio: aspect_ratio.unwrap_or_else(|| settings.image.aspect_ratio.clone()),
        output_format: format.unwrap_or_else(|| settings.image.output_format.clone()),
    };

    let spinner = Output::spinner("Generating image...");
    let outcome = generator.generate(&params).await;
    spinner.finish_and_clear();

    match outcome {
        ImageOutcome::Image {
            mime_type, file, ..
        } => {
            Output::success(&format!("Saved {} to {}", mime_type, file.display()));
            Ok(())
        }
        ImageOutcome::Text { content } => {
            Output::warning("The model answered with text instead of an image:");
            println!("\n{}\n", content);
            Ok(())
        }
        ImageOutcome::EmptyResult => {
            anyhow::bail!("The model returned neither an image nor text")
        }
        ImageOutcome::Failure { reason } => anyhow::bail!("Image generation failed: {}", reason),
    }
}
