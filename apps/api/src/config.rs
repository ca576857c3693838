use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only `DATABASE_URL` is required; every tunable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Hard ceiling on a single PDF render.
    pub pdf_timeout: Duration,
    pub pdf_cache_ttl: Duration,
    pub pdf_cache_max_entries: usize,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
    /// Snapshots retained per draft session, including the current one.
    pub history_depth: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pdf_timeout: Duration::from_secs(env_or("PDF_TIMEOUT_SECS", 60u64)?),
            pdf_cache_ttl: Duration::from_secs(env_or("PDF_CACHE_TTL_SECS", 300u64)?),
            pdf_cache_max_entries: env_or("PDF_CACHE_MAX_ENTRIES", 50usize)?,
            rate_limit_max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", 20u32)?,
            rate_limit_window: Duration::from_secs(env_or("RATE_LIMIT_WINDOW_SECS", 300u64)?),
            history_depth: env_or("HISTORY_DEPTH", 50usize)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' is not a valid value")),
        Err(_) => Ok(default),
    }
}
