//! Configuration loaded from the environment.

use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} env var required")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Credentials and endpoint of the remote video library.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// API base, e.g. `https://video.bunnycdn.com`
    pub api_url: String,
    /// Library API key sent in the `AccessKey` header
    pub access_key: String,
    /// Library every request is scoped to
    pub library_id: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(
        api_url: impl Into<String>,
        access_key: impl Into<String>,
        library_id: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            access_key: access_key.into(),
            library_id: library_id.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    /// SQLite connection string
    pub url: String,
    pub max_connections: u32,
}

/// Configuration for the HTTP server.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: u16,
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
}

const DEFAULT_API_URL: &str = "https://video.bunnycdn.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl AppConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port = parse_number("PORT", &get_or("PORT", "3000"))?;
        let max_connections = parse_number(
            "DATABASE_MAX_CONNECTIONS",
            &get_or("DATABASE_MAX_CONNECTIONS", "5"),
        )?;
        let timeout_secs: u64 = parse_number(
            "BUNNY_TIMEOUT_SECS",
            &get_or("BUNNY_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string()),
        )?;

        Ok(Self {
            addr: get_or("ADDR", "127.0.0.1"),
            port,
            database: DatabaseConfig {
                url: get_or("DATABASE_URL", "sqlite://videos.db"),
                max_connections,
            },
            provider: ProviderConfig {
                api_url: get_or("BUNNY_API_URL", DEFAULT_API_URL),
                access_key: required("BUNNY_ACCESS_KEY")?,
                library_id: required("BUNNY_LIBRARY_ID")?,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
