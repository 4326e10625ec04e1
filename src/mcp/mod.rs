//! MCP (Model Context Protocol) server for mediagen.
//!
//! Exposes `generateImage` and `generateVideo` as tools.
//! Implements JSON-RPC 2.0 over stdio; logs go to stderr.

mod protocol;
mod server;
mod tools;

pub use protocol::{JsonRpcResponse, ToolCallResult, ToolContent};
pub use server::McpServer;
