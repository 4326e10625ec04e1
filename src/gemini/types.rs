//! Wire types for the Gemini REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single generation request, built once per tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: String,
    pub model: String,
    /// First-frame image; selects the image-to-video variant when present.
    pub seed_image: Option<SeedImage>,
}

impl GenerationRequest {
    /// Create a text-only request.
    pub fn new(prompt: &str, aspect_ratio: &str, model: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            aspect_ratio: aspect_ratio.to_string(),
            model: model.to_string(),
            seed_image: None,
        }
    }

    /// Attach a seed image.
    pub fn with_seed_image(mut self, seed_image: Option<SeedImage>) -> Self {
        self.seed_image = seed_image;
        self
    }
}

/// A base64-encoded image attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedImage {
    /// Base64 (standard alphabet) encoded bytes.
    pub data: String,
    pub mime_type: String,
}

/// A response part. Carries at most one of text, inline data or a file reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn inline(mime_type: &str, data: &str) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn file(mime_type: Option<&str>, file_uri: &str) -> Self {
        Self {
            file_data: Some(FileData {
                mime_type: mime_type.map(str::to_string),
                file_uri: file_uri.to_string(),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub file_uri: String,
}

/// `generateContent` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, or nothing.
    pub fn into_parts(self) -> Vec<Part> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Snapshot of a long-running operation. Each poll yields a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl Operation {
    /// An operation that is still running.
    pub fn pending(name: &str) -> Self {
        Self {
            name: name.to_string(),
            done: false,
            response: None,
            error: None,
        }
    }

    /// A finished operation carrying `response`.
    pub fn completed(name: &str, response: Value) -> Self {
        Self {
            name: name.to_string(),
            done: true,
            response: Some(response),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}
