//! CLI module for mediagen.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// mediagen - Gemini image and Veo video generation
///
/// Runs as an MCP server over stdio, or generates media directly from the command line.
#[derive(Parser, Debug)]
#[command(name = "mediagen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Gemini API key (overrides the config file)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Generate an image from a prompt
    Image {
        /// Description of the image
        prompt: String,

        /// Aspect ratio (e.g. 1:1, 16:9)
        #[arg(short, long)]
        aspect_ratio: Option<String>,

        /// File extension for the saved image
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Generate a video from a prompt, optionally seeded with an image
    Video {
        /// Description of the video
        prompt: String,

        /// Aspect ratio (9:16 or 16:9)
        #[arg(short, long)]
        aspect_ratio: Option<String>,

        /// Veo model identifier
        #[arg(short, long)]
        model: Option<String>,

        /// Local image to use as the first frame
        #[arg(short, long)]
        image: Option<String>,
    },

    /// Check API key, output directory and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}
