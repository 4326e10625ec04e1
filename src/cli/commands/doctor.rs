//! Doctor command - verify credentials, output directory and configuration.

use crate::cli::output::mask_secret;
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
///
/// `config_path` is the file passed with `--config`, if any.
pub fn run_doctor(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    Output::header("mediagen doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_api_key(settings.api_key());
    api_check.print();
    checks.push(api_check);
    Output::kv("Endpoint", &settings.gemini.base_url);
    Output::kv("Image model", &settings.image.model);
    Output::kv("Video model", &settings.video.model);

    println!();

    println!("{}", style("Output").bold());
    let dir_check = check_output_dir(&settings.output_dir());
    dir_check.print();
    checks.push(dir_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = match config_path {
        Some(path) => check_config_file(path),
        None => check_config_file(&Settings::default_config_path()),
    };
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before generating media.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! mediagen is ready to use.");
    }

    Ok(())
}

/// Check that an API key is configured.
fn check_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("AIza") => {
            CheckResult::ok("GEMINI_API_KEY", &format!("configured ({})", mask_secret(key)))
        }
        Some(key) => CheckResult::warning(
            "GEMINI_API_KEY",
            &format!("set but format looks unusual ({})", mask_secret(key)),
            "Gemini API keys usually start with AIza",
        ),
        None => CheckResult::error(
            "GEMINI_API_KEY",
            "not set",
            "Set with: export GEMINI_API_KEY='...' or add api_key under [gemini] in the config",
        ),
    }
}

/// Check that the output directory exists (or can be created) and is writable.
fn check_output_dir(dir: &Path) -> CheckResult {
    if let Err(e) = std::fs::create_dir_all(dir) {
        return CheckResult::error(
            "Output directory",
            &format!("{} ({})", dir.display(), e),
            "Set [output] dir to a writable location",
        );
    }

    let probe = dir.join(".mediagen-write-test");
    match std::fs::write(&probe, b"ok") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            CheckResult::ok("Output directory", &format!("{}", dir.display()))
        }
        Err(e) => CheckResult::error(
            "Output directory",
            &format!("{} is not writable ({})", dir.display(), e),
            "Set [output] dir to a writable location",
        ),
    }
}

/// Check if config file exists.
fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: mediagen config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_api_key() {
        assert_eq!(check_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_api_key(Some("something-else")).status, CheckStatus::Warning);

        let ok = check_api_key(Some("AIzaSyExampleKey1234"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(!ok.message.contains("Example"));
    }

    #[test]
    fn test_check_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_output_dir(&dir.path().join("media"));
        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(std::fs::read_dir(dir.path().join("media")).unwrap().count(), 0);
    }

    #[test]
    fn test_check_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_config_file(&dir.path().join("config.toml"));
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_check_custom_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        Settings::default().save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.video.model, "veo-3.0-generate-001");

        let result = check_config_file(&path);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("custom.toml"));
    }
}
