use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use tracing::Level;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub db_max_connections: u32,

    // Rate limiting
    pub rate_per_min: u32,

    pub api_prefix: String,

    // Logging
    pub log_dir: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3101".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: parse_positive("DB_MAX_CONNECTIONS", 10)?,
            rate_per_min: parse_positive("RATE_PER_MIN", 1000)?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: parse_var("LOG_LEVEL", Level::DEBUG)?,
        })
    }
}

/// Reads `key` and parses it, falling back to `default` when the variable is unset.
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Like [`parse_var`], but zero is an error.
fn parse_positive(key: &str, default: u32) -> Result<u32> {
    let value = parse_var(key, default)?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}
