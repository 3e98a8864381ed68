use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

/// Application configuration loaded from TOML config file.
/// All fields have defaults; the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where exported reports are written (defaults to the current directory).
    pub output_dir: Option<PathBuf>,
    /// Analysis service settings.
    pub api: ApiConfig,
}

/// Analysis service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the service; `/api/analyze` is appended.
    pub base_url: String,
    /// Whole-request timeout in seconds. 0 = no timeout.
    pub timeout_secs: u64,
    /// Largest accepted response body in MiB (reports are inlined as base64).
    pub max_body_mb: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            max_body_mb: 64,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/cinemood/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolve the report directory: explicit > config > current directory.
    pub fn resolve_output_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let c = AppConfig::parse("").unwrap();
        assert!(c.output_dir.is_none());
        assert_eq!(c.api.base_url, "http://localhost:8000");
        assert_eq!(c.api.timeout_secs, 120);
    }

    #[test]
    fn test_partial_api_section() {
        let c = AppConfig::parse(
            r#"
            output_dir = "/tmp/reports"

            [api]
            base_url = "https://cinemood.example"
            "#,
        )
        .unwrap();
        assert_eq!(c.output_dir, Some(PathBuf::from("/tmp/reports")));
        assert_eq!(c.api.base_url, "https://cinemood.example");
        assert_eq!(c.api.max_body_mb, 64);
    }

    #[test]
    fn test_bad_config_is_error() {
        assert!(AppConfig::parse("api = 3").is_err());
    }

    #[test]
    fn test_output_dir_precedence() {
        let c = AppConfig {
            output_dir: Some(PathBuf::from("cfg")),
            ..AppConfig::default()
        };
        assert_eq!(c.resolve_output_dir(Some(PathBuf::from("cli"))), PathBuf::from("cli"));
        assert_eq!(c.resolve_output_dir(None), PathBuf::from("cfg"));
        assert_eq!(AppConfig::default().resolve_output_dir(None), PathBuf::from("."));
    }
}
