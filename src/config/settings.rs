//! Configuration settings for mediagen.

use crate::video::PollPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Lower bound for the video poll interval.
const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub gemini: GeminiSettings,
    pub image: ImageSettings,
    pub video: VideoSettings,
    pub output: OutputSettings,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key. The `GEMINI_API_KEY` environment variable takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL including the API version segment.
    pub base_url: String,
    /// Timeout applied to each individual HTTP request.
    pub request_timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Image generation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Model used for `generateContent` image synthesis.
    pub model: String,
    /// Aspect ratio applied when the caller does not pass one.
    pub aspect_ratio: String,
    /// File extension for saved images.
    pub output_format: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-image-preview".to_string(),
            aspect_ratio: "1:1".to_string(),
            output_format: "png".to_string(),
        }
    }
}

/// Video generation defaults and polling budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Veo model identifier.
    pub model: String,
    /// Aspect ratio applied when the caller does not pass one.
    pub aspect_ratio: String,
    /// Seconds between operation polls.
    pub poll_interval_secs: u64,
    /// Total seconds to wait for an operation before giving up.
    pub timeout_secs: u64,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            model: "veo-3.0-generate-001".to_string(),
            aspect_ratio: "9:16".to_string(),
            poll_interval_secs: 10,
            timeout_secs: 300, // 5 minutes
        }
    }
}

/// Where generated artifacts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output directory, relative to the working directory unless absolute.
    pub dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::MediaGenError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mediagen")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.output.dir)
    }

    /// Override the API key, ignoring empty values.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
        self
    }

    /// The configured API key, if any non-empty one is set.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    /// Polling policy for video operations.
    ///
    /// The interval never drops below one second.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(
                self.video.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS),
            ),
            timeout: Duration::from_secs(self.video.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.image.aspect_ratio, "1:1");
        assert_eq!(settings.image.output_format, "png");
        assert_eq!(settings.video.aspect_ratio, "9:16");
        assert_eq!(settings.video.model, "veo-3.0-generate-001");

        let policy = settings.poll_policy();
        assert_eq!(policy.interval, Duration::from_secs(10));
        assert_eq!(policy.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [video]
            timeout_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(settings.video.timeout_secs, 60);
        assert_eq!(settings.video.poll_interval_secs, 10);
        assert_eq!(settings.gemini.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let mut settings = Settings::default();
        settings.video.poll_interval_secs = 0;
        assert_eq!(settings.poll_policy().interval, Duration::from_secs(1));
    }

    #[test]
    fn test_api_key_override() {
        let settings = Settings::default().with_api_key(Some("  ".to_string()));
        assert!(settings.api_key().is_none());

        let settings = settings.with_api_key(Some("abc".to_string()));
        assert_eq!(settings.api_key(), Some("abc"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.output.dir, ".");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.video.poll_interval_secs = 5;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.video.poll_interval_secs, 5);
    }
}
