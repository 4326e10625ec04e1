//! MCP server implementation.

use super::protocol::*;
use super::tools::{get_tools, GenerateImageArgs, GenerateVideoArgs, GENERATE_IMAGE, GENERATE_VIDEO};
use crate::artifact::ArtifactStore;
use crate::config::Settings;
use crate::gemini::{ClientConfig, GeminiClient, MediaClient};
use crate::image::{ImageGenerator, ImageOutcome, ImageParams};
use crate::video::{VideoOrchestrator, VideoParams};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "mediagen";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server exposing the image and video tools.
pub struct McpServer {
    settings: Settings,
    images: ImageGenerator,
    videos: VideoOrchestrator,
}

impl McpServer {
    /// Create a server backed by the Gemini API.
    pub fn new(settings: Settings) -> crate::error::Result<Self> {
        let client = GeminiClient::new(ClientConfig::from_settings(&settings))?;
        Ok(Self::with_client(settings, Arc::new(client)))
    }

    /// Create a server with a custom backend.
    pub fn with_client(settings: Settings, client: Arc<dyn MediaClient>) -> Self {
        let store = ArtifactStore::new(settings.output_dir());
        let images = ImageGenerator::new(client.clone(), store.clone(), &settings.image.model);
        let videos = VideoOrchestrator::new(client, store, settings.poll_policy());

        Self {
            settings,
            images,
            videos,
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        info!("MCP server starting (protocol {})", PROTOCOL_VERSION);

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one line of input. Returns `None` for blank lines and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"))
            }
        }
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            debug!("Unexpected jsonrpc version {:?}", request.jsonrpc);
        }

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok());
        if let Some(params) = params {
            let (name, version) = params
                .client_info
                .map(|c| (c.name, c.version.unwrap_or_default()))
                .unwrap_or_else(|| ("unknown".to_string(), String::new()));
            info!(
                "Client {} {} connected (protocol {})",
                name,
                version,
                params.protocol_version.as_deref().unwrap_or("unspecified")
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        to_response(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        to_response(id, &ToolsListResult { tools: get_tools() })
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        info!("Tool call: {}", params.name);
        let result = match params.name.as_str() {
            GENERATE_IMAGE => self.tool_generate_image(params.arguments).await,
            GENERATE_VIDEO => self.tool_generate_video(params.arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        to_response(id, &result)
    }

    /// generateImage tool.
    async fn tool_generate_image(&self, args: Option<Value>) -> ToolCallResult {
        let args: GenerateImageArgs = match parse_args(args) {
            Ok(a) => a,
            Err(message) => return ToolCallResult::error(message),
        };

        let params = ImageParams {
            prompt: args.prompt,
            aspect_ratio: args
                .aspect_ratio
                .unwrap_or_else(|| self.settings.image.aspect_ratio.clone()),
            output_format: args
                .output_format
                .unwrap_or_else(|| self.settings.image.output_format.clone()),
        };

        match self.images.generate(&params).await {
            ImageOutcome::Image {
                data, mime_type, ..
            } => ToolCallResult::image(data, mime_type),
            ImageOutcome::Text { content } => ToolCallResult::text(content),
            ImageOutcome::EmptyResult => {
                ToolCallResult::error("The model returned neither an image nor text.".to_string())
            }
            ImageOutcome::Failure { reason } => {
                ToolCallResult::error(format!("Image generation failed: {}", reason))
            }
        }
    }

    /// generateVideo tool.
    async fn tool_generate_video(&self, args: Option<Value>) -> ToolCallResult {
        let args: GenerateVideoArgs = match parse_args(args) {
            Ok(a) => a,
            Err(message) => return ToolCallResult::error(message),
        };

        let params = VideoParams {
            prompt: args.prompt,
            aspect_ratio: args
                .aspect_ratio
                .unwrap_or_else(|| self.settings.video.aspect_ratio.clone()),
            model: args
                .model
                .unwrap_or_else(|| self.settings.video.model.clone()),
            image_path: args.image_path,
        };

        // The `status` field carries failures; the call itself succeeds.
        let outcome = self.videos.generate(&params).await;
        if !outcome.is_success() {
            warn!("generateVideo finished without a video");
        }
        ToolCallResult::text(outcome.to_json())
    }
}

/// Deserialize tool arguments, reporting problems as tool errors.
fn parse_args<T: DeserializeOwned>(args: Option<Value>) -> Result<T, String> {
    let args = args.ok_or_else(|| "Missing arguments".to_string())?;
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

fn to_response<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &format!("Internal error: {}", e)),
    }
}
