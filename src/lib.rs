//! mediagen - Gemini image and Veo video generation
//!
//! Exposes still-image and short-video synthesis as MCP tools over stdio, and
//! as plain CLI commands.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `artifact` - Writes generated media to disk
//! - `gemini` - Remote media client (trait + REST implementation)
//! - `extract` - Picks the authoritative result out of a response
//! - `video` - Long-running video operation orchestration
//! - `image` - Synchronous image generation
//! - `mcp` - JSON-RPC 2.0 server over stdio
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mediagen::artifact::ArtifactStore;
//! use mediagen::config::Settings;
//! use mediagen::gemini::{ClientConfig, GeminiClient};
//! use mediagen::video::{VideoOrchestrator, VideoParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = Arc::new(GeminiClient::new(ClientConfig::from_settings(&settings))?);
//!     let orchestrator = VideoOrchestrator::new(
//!         client,
//!         ArtifactStore::new(settings.output_dir()),
//!         settings.poll_policy(),
//!     );
//!
//!     let outcome = orchestrator
//!         .generate(&VideoParams {
//!             prompt: "a cat surfing at sunset".to_string(),
//!             aspect_ratio: "16:9".to_string(),
//!             model: settings.video.model.clone(),
//!             image_path: None,
//!         })
//!         .await;
//!     println!("{}", outcome.to_json());
//!
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod image;
pub mod mcp;
pub mod video;

pub use error::{MediaGenError, Result};
