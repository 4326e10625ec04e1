//! Error types for mediagen.

use thiserror::Error;

/// Library-level error type for mediagen operations.
#[derive(Error, Debug)]
pub enum MediaGenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Download failed with HTTP status {status}")]
    Download { status: u16 },

    #[error("Failed to decode payload: {0}")]
    Decode(String),
}

/// Result type alias for mediagen operations.
pub type Result<T> = std::result::Result<T, MediaGenError>;
