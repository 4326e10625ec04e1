//! Remote media client for the Gemini API.
//!
//! Wraps two capabilities behind [`MediaClient`]:
//! - synchronous `generateContent` calls that return inline parts
//! - long-running Veo operations (submit, poll, download)

mod client;
mod types;

pub use client::{authorized_uri, ClientConfig, GeminiClient};
pub use types::{
    Candidate, Content, FileData, GenerateContentResponse, GenerationRequest, InlineData,
    Operation, OperationError, Part, SeedImage,
};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for remote generation backends.
#[async_trait]
pub trait MediaClient: Send + Sync {
    /// Run a synchronous text+image generation and return the response parts.
    async fn generate_content(&self, request: &GenerationRequest) -> Result<Vec<Part>>;

    /// Submit a video generation job and return the first operation snapshot.
    async fn submit_video(&self, request: &GenerationRequest) -> Result<Operation>;

    /// Fetch a fresh snapshot of the named operation.
    async fn get_operation(&self, name: &str) -> Result<Operation>;

    /// Download a generated artifact by URI.
    async fn download(&self, uri: &str) -> Result<Vec<u8>>;
}
