//! mediagen CLI entry point.

use anyhow::Result;
use clap::Parser;
use mediagen::cli::{commands, Cli, Commands};
use mediagen::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for MCP traffic and command output
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("mediagen={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?.with_api_key(cli.api_key.clone());

    // Execute command
    match &cli.command {
        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Image {
            prompt,
            aspect_ratio,
            format,
        } => {
            commands::run_image(prompt, aspect_ratio.clone(), format.clone(), settings).await?;
        }

        Commands::Video {
            prompt,
            aspect_ratio,
            model,
            image,
        } => {
            commands::run_video(
                prompt,
                aspect_ratio.clone(),
                model.clone(),
                image.clone(),
                settings,
            )
            .await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_deref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
