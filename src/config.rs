use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use tokio::fs;

pub const ENV_BASE_URL: &str = "BOARDSYNC_BASE_URL";
pub const ENV_ACCESS_TOKEN: &str = "BOARDSYNC_ACCESS_TOKEN";
pub const ENV_API_TOKEN: &str = "BOARDSYNC_API_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "BOARDSYNC_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection settings for the remote task service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Bearer token of the signed-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Per-application token sent in the `TokenCybersoft` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServiceConfig {
    pub const CONFIG_FILE: &'static str = "boardsync.toml";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: None,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Parses and validates a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| BoardError::ConfigError(e.to_string()))?;
        config.normalized()
    }

    /// Loads a config file, then applies environment overrides
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BoardError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).await?;
        Self::from_toml_str(&contents)?.apply_env_overrides()
    }

    /// Builds a config from environment variables alone
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_BASE_URL)
            .ok_or_else(|| BoardError::ConfigError(format!("{} is not set", ENV_BASE_URL)))?;
        Self::new(base_url).apply_overrides(lookup)
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                BoardError::ConfigError(format!("{} must be a number: {}", ENV_TIMEOUT_SECS, secs))
            })?;
        }
        self.normalized()
    }

    /// Validates and trims a trailing `/` off the base URL
    pub fn normalized(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(BoardError::ConfigError("base_url is empty".to_string()));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(BoardError::ConfigError(format!(
                "base_url must start with http:// or https://: {}",
                trimmed
            )));
        }
        if self.timeout_secs == 0 {
            return Err(BoardError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
