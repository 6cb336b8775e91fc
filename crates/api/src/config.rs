use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use studio_core::upload::DEFAULT_MAX_UPLOAD_BYTES;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
    /// Directory uploaded images are written to.
    pub upload_dir: PathBuf,
    /// Public path prefix of asset locators, e.g. `/uploads`.
    pub asset_url_prefix: String,
    /// Largest accepted image upload.
    pub max_upload_bytes: usize,
    /// Minimum age before an unreferenced asset may be swept.
    pub orphan_grace: Duration,
}

fn parsed<T: FromStr>(
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value,
    })
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed("PORT", "3030", "u16")?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", "20", "u32")?,
            db_min_connections: parsed("DB_MIN_CONNECTIONS", "5", "u32")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "public/uploads".to_string())
                .into(),
            asset_url_prefix: normalize_prefix(
                &env::var("ASSET_URL_PREFIX").unwrap_or_else(|_| "/uploads".to_string()),
            ),
            max_upload_bytes: parsed(
                "MAX_UPLOAD_BYTES",
                &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
                "byte count",
            )?,
            orphan_grace: Duration::from_secs(parsed("ORPHAN_GRACE_SECS", "3600", "u64")?),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `uploads/` and `/uploads/` both become `/uploads`.
fn normalize_prefix(raw: &str) -> String {
    format!("/{}", raw.trim().trim_matches('/'))
}

#[cfg(test)]
impl AppConfig {
    /// Configuration for in-process router tests; nothing is read from the environment.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: String::new(),
            db_max_connections: 1,
            db_min_connections: 0,
            log_level: "debug".to_string(),
            upload_dir,
            asset_url_prefix: "/uploads".to_string(),
            max_upload_bytes: 1024 * 1024,
            orphan_grace: Duration::from_secs(3600),
        }
    }
}
