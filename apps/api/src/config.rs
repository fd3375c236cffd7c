use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Redis,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "redis" => Ok(StorageBackend::Redis),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => bail!("Unknown STORAGE_BACKEND '{other}' (expected memory, redis or postgres)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub redis_url: Option<String>,
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl: Duration,
    pub max_parse_chars: usize,
    pub max_jd_chars: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend: StorageBackend = optional_env("STORAGE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .parse()?;

        Ok(Config {
            storage_backend,
            redis_url: match storage_backend {
                StorageBackend::Redis => Some(require_env("REDIS_URL")?),
                _ => optional_env("REDIS_URL"),
            },
            database_url: match storage_backend {
                StorageBackend::Postgres => Some(require_env("DATABASE_URL")?),
                _ => optional_env("DATABASE_URL"),
            },
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_ttl: Duration::from_secs(parse_env("SESSION_TTL_SECS", 7 * 24 * 60 * 60)?),
            max_parse_chars: parse_env("MAX_PARSE_CHARS", 10_000)?,
            max_jd_chars: parse_env("MAX_JD_CHARS", 5_000)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} must be a valid value: {e}")),
    }
}

#[cfg(test)]
impl Config {
    /// In-memory config used by handler tests.
    pub fn for_tests() -> Self {
        Config {
            storage_backend: StorageBackend::Memory,
            redis_url: None,
            database_url: None,
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            max_parse_chars: 10_000,
            max_jd_chars: 5_000,
            max_upload_bytes: 1024 * 1024,
        }
    }
}
