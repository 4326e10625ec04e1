//! Pre-flight checks before remote generation calls.
//!
//! Catches a missing key up front instead of after a failed request.

use crate::config::Settings;
use crate::error::{MediaGenError, Result};

/// Check that an API key is configured.
pub fn check_api_key(settings: &Settings) -> Result<()> {
    match settings.api_key() {
        Some(_) => Ok(()),
        None => Err(MediaGenError::Config(
            "GEMINI_API_KEY not set. Set it with: export GEMINI_API_KEY='...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_api_key() {
        let settings = Settings::default();
        assert!(check_api_key(&settings).is_err());

        let settings = settings.with_api_key(Some("key".to_string()));
        assert!(check_api_key(&settings).is_ok());
    }
}
