//! Configuration module for mediagen.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    GeminiSettings, ImageSettings, OutputSettings, Settings, VideoSettings, DEFAULT_BASE_URL,
};
