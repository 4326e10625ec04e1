//! MCP command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use anyhow::Result;
use tracing::warn;

/// Run the MCP server.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    if settings.api_key().is_none() {
        warn!("GEMINI_API_KEY is not set; tool calls will fail until it is configured");
    }

    let server = McpServer::new(settings)?;
    server.run().await
}
