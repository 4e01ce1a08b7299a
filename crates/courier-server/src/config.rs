use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Duration;

use courier_auth::HashCost;

/// Process configuration, read once at startup and passed down by
/// value. Nothing below reads the environment again.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub secret_key: String,
    /// Unset means tokens never expire, matching the historical
    /// deployment; set it to opt into expiring sessions.
    pub token_ttl: Option<Duration>,
    pub hash_cost: HashCost,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token_ttl = match std::env::var("COURIER_TOKEN_TTL_SECS") {
            Ok(raw) => {
                let secs: i64 = raw
                    .parse()
                    .context("COURIER_TOKEN_TTL_SECS must be a number of seconds")?;
                Some(Duration::seconds(secs))
            }
            Err(_) => None,
        };

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parsed_or("COURIER_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parsed_or("COURIER_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parsed_or("COURIER_HASH_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            host: env_or("COURIER_HOST", "0.0.0.0"),
            port: parsed_or("COURIER_PORT", 3000)?,
            db_path: PathBuf::from(env_or("COURIER_DB_PATH", "courier.db")),
            secret_key: env_or("COURIER_SECRET_KEY", "dev-secret-change-me"),
            token_ttl,
            hash_cost,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a number")),
        Err(_) => Ok(default),
    }
}
