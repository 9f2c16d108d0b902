//! Form configuration loaded from `REGISTER_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Proxy registration endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Page to send the user to after signing up
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Delay before the redirect
    #[serde(default = "default_redirect_delay", with = "humantime_serde")]
    pub redirect_delay: Duration,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    "http://localhost:3001/api/register".into()
}

fn default_login_url() -> String {
    "/login".into()
}

fn default_redirect_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_log_level() -> String {
    "warn".into()
}

impl FormConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_environment(None)
    }

    pub fn from_environment(source: Option<config::Map<String, String>>) -> Result<Self> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("REGISTER")
                    .prefix_separator("_")
                    .try_parsing(false)
                    .source(source),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormConfig::from_environment(Some(config::Map::new())).unwrap();

        assert_eq!(config.api_url, "http://localhost:3001/api/register");
        assert_eq!(config.login_url, "/login");
        assert_eq!(config.redirect_delay, Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let mut env = config::Map::new();
        env.insert("REGISTER_API_URL".to_string(), "https://signup.example.com/api/register".to_string());
        env.insert("REGISTER_REDIRECT_DELAY".to_string(), "500ms".to_string());

        let config = FormConfig::from_environment(Some(env)).unwrap();
        assert_eq!(config.api_url, "https://signup.example.com/api/register");
        assert_eq!(config.redirect_delay, Duration::from_millis(500));
    }
}
