//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Username;

/// Placeholder replaced by the sanitized handle in `upstream.url_template`.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream calendar page settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// CLI behavior settings
    #[serde(default)]
    pub cli: CliConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.user_agent.trim().is_empty() {
            return Err(AppError::validation("upstream.user_agent is empty"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(AppError::validation("upstream.timeout_secs must be > 0"));
        }
        if !self.upstream.url_template.contains(USERNAME_PLACEHOLDER) {
            return Err(AppError::validation(format!(
                "upstream.url_template must contain {USERNAME_PLACEHOLDER}"
            )));
        }
        let default_username = self.upstream.default_username()?;
        self.upstream
            .url_for(&default_username)
            .map_err(|e| AppError::validation(format!("upstream.url_template: {e}")))?;
        if self.cache.enabled && self.cache.ttl_secs == 0 {
            return Err(AppError::validation(
                "cache.ttl_secs must be > 0 when the cache is enabled",
            ));
        }
        if self.cli.max_concurrent == 0 {
            return Err(AppError::validation("cli.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

/// Upstream contribution page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Page URL with a `{username}` placeholder
    #[serde(default = "defaults::url_template")]
    pub url_template: String,

    /// User-Agent header identifying this service
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header sent with each request
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Handle used when the caller supplies none or an invalid one
    #[serde(default = "defaults::default_username")]
    pub default_username: String,
}

impl UpstreamConfig {
    /// The fallback handle, which must itself be a valid handle.
    pub fn default_username(&self) -> Result<Username> {
        Username::parse(&self.default_username)
            .map_err(|e| AppError::validation(format!("upstream.default_username: {e}")))
    }

    /// Build the page URL for a validated handle.
    pub fn url_for(&self, username: &Username) -> Result<Url> {
        let raw = self
            .url_template
            .replace(USERNAME_PLACEHOLDER, username.as_str());
        Ok(Url::parse(&raw)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url_template: defaults::url_template(),
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            timeout_secs: defaults::timeout(),
            default_username: defaults::default_username(),
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether upstream pages are cached at all
    #[serde(default = "defaults::cache_enabled")]
    pub enabled: bool,

    /// How long a fetched page stays fresh, in seconds
    #[serde(default = "defaults::cache_ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::cache_enabled(),
            ttl_secs: defaults::cache_ttl(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::address")]
    pub address: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: defaults::address(),
            port: defaults::port(),
        }
    }
}

/// CLI behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Maximum concurrent upstream requests for multi-user runs
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

mod defaults {
    // Upstream defaults
    pub fn url_template() -> String {
        "https://github.com/users/{username}/contributions".into()
    }
    pub fn user_agent() -> String {
        "contrib-calendar/0.1 (+contribution heatmap widget)".into()
    }
    pub fn accept() -> String {
        "text/html,text/plain,*/*".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn default_username() -> String {
        "CodingWithKantecki".into()
    }

    // Cache defaults
    pub fn cache_enabled() -> bool {
        true
    }
    pub fn cache_ttl() -> u64 {
        3600
    }

    // Server defaults
    pub fn address() -> String {
        "127.0.0.1".into()
    }
    pub fn port() -> u16 {
        8000
    }

    // CLI defaults
    pub fn max_concurrent() -> usize {
        4
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_username_and_ttl() {
        let config = Config::default();
        assert_eq!(
            config.upstream.default_username().unwrap().as_str(),
            "CodingWithKantecki"
        );
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.upstream.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.upstream.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_template_without_placeholder() {
        let mut config = Config::default();
        config.upstream.url_template = "https://github.com/users/contributions".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_relative_template() {
        let mut config = Config::default();
        config.upstream.url_template = "/users/{username}/contributions".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl_only_when_enabled() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());
        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.cli.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_for_interpolates_handle() {
        let upstream = UpstreamConfig::default();
        let name = Username::parse("octocat").unwrap();
        assert_eq!(
            upstream.url_for(&name).unwrap().as_str(),
            "https://github.com/users/octocat/contributions"
        );
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[upstream]\ndefault_username = \"octocat\"\n\n[cache]\nttl_secs = 60"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.upstream.default_username, "octocat");
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(config.cache.enabled);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_validate_rejects_invalid_default_username() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\ndefault_username = \"not valid\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_survives_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.server.address, "127.0.0.1");
    }
}
