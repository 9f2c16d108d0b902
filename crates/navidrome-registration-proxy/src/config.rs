//! Configuration for the registration proxy.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Proxy configuration, read once at startup.
///
/// Top-level keys map to the flat environment variables the service has
/// always used (`NAVIDROME_URL`, `PORT`, ...); sections nest with `__`
/// (`RATE_LIMIT__WINDOW`).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Navidrome base URL
    pub navidrome_url: String,

    /// Navidrome administrator username
    pub navidrome_admin_user: String,

    /// Navidrome administrator password
    pub navidrome_admin_password: SecretString,

    /// Origin allowed by CORS (`*` allows any)
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Outbound call configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Deadline for each call to Navidrome
    #[serde(default = "default_upstream_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Registration attempts allowed per client in one window
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Length of a client's window
    #[serde(default = "default_window", with = "humantime_serde")]
    pub window: Duration,

    /// Registration attempts allowed per minute across all clients
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,

    /// Identify clients by the first `X-Forwarded-For` entry
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// Default implementations
impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout: default_upstream_timeout(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window: default_window(),
            global_per_minute: default_global_rpm(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// Default value functions
fn default_frontend_url() -> String {
    "*".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3001
}

fn default_upstream_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window() -> Duration {
    Duration::from_secs(15 * 60)
}

fn default_global_rpm() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_environment(None)
    }

    /// Build configuration from the process environment, or from `source`
    /// when given.
    pub fn from_environment(source: Option<config::Map<String, String>>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false)
                    .source(source),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if config.navidrome_url.trim().is_empty() {
            anyhow::bail!("NAVIDROME_URL must not be empty");
        }

        config.socket_addr()?;

        Ok(config)
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid LISTEN_ADDR: {}", self.listen_addr))?;

        Ok(SocketAddr::new(ip, self.port))
    }
}
