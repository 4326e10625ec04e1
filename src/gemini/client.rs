//! HTTP implementation of [`MediaClient`] against the Gemini REST API.

use super::types::{GenerateContentResponse, GenerationRequest, Operation, Part};
use super::MediaClient;
use crate::config::{Settings, DEFAULT_BASE_URL};
use crate::error::{MediaGenError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default timeout for a single HTTP request (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Header carrying the API key on JSON endpoints.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build a client config from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_key: settings.api_key().map(str::to_string),
            base_url: settings.gemini.base_url.clone(),
            timeout: Duration::from_secs(settings.gemini.request_timeout_secs),
        }
    }
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GeminiClient {
    /// Create a client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| MediaGenError::Config("GEMINI_API_KEY is not set".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .header(API_KEY_HEADER, self.api_key()?)
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .header(API_KEY_HEADER, self.api_key()?)
            .send()
            .await?;
        parse_response(response).await
    }
}

#[async_trait]
impl MediaClient for GeminiClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate_content(&self, request: &GenerationRequest) -> Result<Vec<Part>> {
        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": { "aspectRatio": request.aspect_ratio }
            }
        });

        let path = format!("models/{}:generateContent", request.model);
        let response: GenerateContentResponse = self.post_json(&path, &body).await?;
        let parts = response.into_parts();
        debug!("generateContent returned {} parts", parts.len());
        Ok(parts)
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn submit_video(&self, request: &GenerationRequest) -> Result<Operation> {
        let mut instance = json!({ "prompt": request.prompt });
        if let Some(image) = &request.seed_image {
            instance["image"] = json!({
                "bytesBase64Encoded": image.data,
                "mimeType": image.mime_type,
            });
        }

        let body = json!({
            "instances": [instance],
            "parameters": { "aspectRatio": request.aspect_ratio }
        });

        let path = format!("models/{}:predictLongRunning", request.model);
        let operation: Operation = self.post_json(&path, &body).await?;
        info!("Submitted video operation {}", operation.name);
        Ok(operation)
    }

    #[instrument(skip(self))]
    async fn get_operation(&self, name: &str) -> Result<Operation> {
        self.get_json(name).await
    }

    #[instrument(skip(self, uri))]
    async fn download(&self, uri: &str) -> Result<Vec<u8>> {
        let url = authorized_uri(uri, self.api_key()?);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaGenError::Download {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Append the API key as a query parameter, respecting an existing query string.
pub fn authorized_uri(uri: &str, api_key: &str) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}key={}", uri, separator, api_key)
}

/// Decode a JSON body or turn a non-2xx status into [`MediaGenError::Api`].
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MediaGenError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Pull `error.message` out of a Google API error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
