//! Image generation through a single `generateContent` call.

use crate::artifact::{timestamped_filename, ArtifactStore, IMAGE_PREFIX};
use crate::error::{MediaGenError, Result};
use crate::extract::{select_result, ResultPayload};
use crate::gemini::{GenerationRequest, MediaClient};
use base64::Engine;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Caller-supplied parameters with defaults already applied.
#[derive(Debug, Clone)]
pub struct ImageParams {
    pub prompt: String,
    pub aspect_ratio: String,
    /// Extension of the saved file.
    pub output_format: String,
}

/// Result of an image generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// An image was produced and saved.
    Image {
        /// Base64-encoded image bytes.
        data: String,
        mime_type: String,
        file: PathBuf,
    },
    /// The model answered with text only.
    Text { content: String },
    /// The response carried neither image nor text.
    EmptyResult,
    Failure { reason: String },
}

/// Generates still images.
pub struct ImageGenerator {
    client: Arc<dyn MediaClient>,
    store: ArtifactStore,
    model: String,
}

impl ImageGenerator {
    pub fn new(client: Arc<dyn MediaClient>, store: ArtifactStore, model: &str) -> Self {
        Self {
            client,
            store,
            model: model.to_string(),
        }
    }

    /// Generate an image and return the outcome. Never fails.
    #[instrument(skip(self, params), fields(model = %self.model))]
    pub async fn generate(&self, params: &ImageParams) -> ImageOutcome {
        match self.try_generate(params).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Image generation failed: {}", e);
                ImageOutcome::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_generate(&self, params: &ImageParams) -> Result<ImageOutcome> {
        let request = GenerationRequest::new(&params.prompt, &params.aspect_ratio, &self.model);
        let parts = self.client.generate_content(&request).await?;

        let (bytes, mime_type) = match select_result(&parts) {
            Some(ResultPayload::InlineBinary { data, mime_type }) => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(&data)
                    .map_err(|e| MediaGenError::Decode(e.to_string()))?;
                (bytes, mime_type)
            }
            Some(ResultPayload::RemoteReference { uri, mime_type }) => {
                let bytes = self.client.download(&uri).await?;
                let mime_type =
                    mime_type.unwrap_or_else(|| format_mime_type(&params.output_format));
                (bytes, mime_type)
            }
            Some(ResultPayload::Text { content }) => {
                info!("Model returned text instead of an image");
                return Ok(ImageOutcome::Text { content });
            }
            None => {
                warn!("Model returned neither image nor text");
                return Ok(ImageOutcome::EmptyResult);
            }
        };

        let filename = timestamped_filename(IMAGE_PREFIX, &params.output_format);
        let file = self.store.save(&filename, &bytes).await?;
        info!("Saved image to {}", file.display());

        Ok(ImageOutcome::Image {
            data: base64::engine::general_purpose::STANDARD.encode(&bytes),
            mime_type,
            file,
        })
    }
}

/// MIME type for an output format name.
fn format_mime_type(format: &str) -> String {
    match format.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "webp" => "image/webp".to_string(),
        _ => "image/png".to_string(),
    }
}
