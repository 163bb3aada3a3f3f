//! Configuration loading for the ATLAS TUI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use atlas_core::ModelKey;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    /// Absent means requests never time out.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    pub default_model: String,
    /// Send the tunnel bypass header on every request.
    pub tunnel_bypass: bool,
    pub tick_rate_ms: u64,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or ATLAS_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api_base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        match reqwest::Url::parse(base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    field: "api_base_url",
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(err) => {
                return Err(ConfigError::InvalidValue {
                    field: "api_base_url",
                    reason: err.to_string(),
                });
            }
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0 when set".to_string(),
            });
        }
        if let Err(reason) = self.default_model.parse::<ModelKey>() {
            return Err(ConfigError::InvalidValue {
                field: "default_model",
                reason,
            });
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.to_ascii_lowercase() != "synthbrute" {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "only 'synthbrute' is supported".to_string(),
            });
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    /// Model selected at startup. Falls back to the backend default if the
    /// config was not validated.
    pub fn model(&self) -> ModelKey {
        self.default_model.parse().unwrap_or_default()
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("ATLAS_TUI_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
api_base_url = "https://atlas.example.ngrok-free.app/"
default_model = "mistral"
tunnel_bypass = true
tick_rate_ms = 250
persistence_path = "tmp/atlas-tui.json"
log_path = "tmp/atlas-tui.log"

[theme]
name = "synthbrute"
"#;

    #[test]
    fn test_parses_sample_without_timeout() {
        let config = TuiConfig::from_toml(SAMPLE).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout_ms, None);
        assert_eq!(config.base_url(), "https://atlas.example.ngrok-free.app");
        assert_eq!(config.model(), ModelKey::Mistral);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let contents = format!("retries = 3\n{}", SAMPLE);
        assert!(matches!(
            TuiConfig::from_toml(&contents),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = TuiConfig::from_toml(SAMPLE).unwrap();
        config.api_base_url = "ftp://atlas.example".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "api_base_url", .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_model() {
        let mut config = TuiConfig::from_toml(SAMPLE).unwrap();
        config.default_model = "gpt4".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "default_model", .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = TuiConfig::from_toml(SAMPLE).unwrap();
        config.request_timeout_ms = Some(0);
        assert!(config.validate().is_err());
        config.request_timeout_ms = Some(30_000);
        assert!(config.validate().is_ok());
    }
}
