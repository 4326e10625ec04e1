//! Terminal result of one video generation call.

use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Exactly one variant is produced per call; it is returned to the caller as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        file: PathBuf,
        /// Megabytes, one decimal place.
        size_mb: String,
        model: String,
        #[serde(rename = "aspectRatio")]
        aspect_ratio: String,
    },
    #[serde(rename = "timeout")]
    TimedOut {
        operation_name: String,
        elapsed_ms: u64,
    },
    #[serde(rename = "empty")]
    EmptyResult { raw_response: Value },
    #[serde(rename = "error")]
    Failure { reason: String },
}

impl Outcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Outcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Pretty JSON for the tool response.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| error_json(&e.to_string()))
    }
}

/// Minimal error document used when an outcome cannot be serialized.
fn error_json(reason: &str) -> String {
    json!({ "status": "error", "reason": reason }).to_string()
}
