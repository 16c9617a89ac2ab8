//! Application configuration
//!
//! Loaded from a TOML file; every key is optional.

use crate::draft::{Draft, DraftField};
use crate::error::ConfigError;
use dishook_discord::TransportConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`]
pub const CONFIG_ENV_VAR: &str = "DISHOOK_CONFIG";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where the webhook history is stored
    pub history_path: PathBuf,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// Log messages instead of sending them
    pub dry_run: bool,

    /// Default bot name override
    pub username: Option<String>,

    /// Default bot avatar override
    pub avatar_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from("webhooks.json"),
            timeout_secs: 10,
            dry_run: false,
            username: None,
            avatar_url: None,
        }
    }
}

impl AppConfig {
    /// Load from `$DISHOOK_CONFIG`, falling back to the default path.
    /// A missing file yields the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(Path::new(&path))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        Ok(config)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            dry_run: self.dry_run,
        }
    }

    /// A fresh draft carrying the configured identity overrides
    pub fn new_draft(&self) -> Draft {
        let mut draft = Draft::new();
        if let Some(username) = &self.username {
            draft.set_field(DraftField::Username, username.as_str());
        }
        if let Some(avatar_url) = &self.avatar_url {
            draft.set_field(DraftField::AvatarUrl, avatar_url.as_str());
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dishook.toml");
        std::fs::write(
            &path,
            r#"
history_path = "/tmp/hooks.json"
dry_run = true
username = "Deploy Bot"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.history_path, PathBuf::from("/tmp/hooks.json"));
        assert!(config.dry_run);
        assert_eq!(config.timeout_secs, 10);

        let transport = config.transport_config();
        assert!(transport.dry_run);
        assert_eq!(transport.timeout, Duration::from_secs(10));

        let draft = config.new_draft();
        assert_eq!(draft.username, "Deploy Bot");
        assert!(draft.avatar_url.is_empty());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dishook.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::ParseError { .. })
        ));

        std::fs::write(&path, "timeout_secs = 0").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
