use std::time::Duration;

use anyhow::Context;
use url::Url;

const DEFAULT_POKE_API_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub poke_api_base_url: Url,
    pub poke_api_timeout: Duration,
    pub skip_migrations: bool,
    pub debug_mode: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?,
            None => 3000,
        };

        let base = lookup("POKE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_POKE_API_BASE_URL.to_string());
        let poke_api_base_url = Url::parse(base.trim_end_matches('/'))
            .with_context(|| format!("POKE_API_BASE_URL is not a valid URL: '{}'", base))?;

        let timeout_secs = match lookup("POKE_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("POKE_API_TIMEOUT_SECS must be a number, got '{}'", raw))?,
            None => 10,
        };

        let skip_migrations = lookup("SKIP_MIGRATIONS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);
        let debug_mode = lookup("DEBUG_MODE").unwrap_or_default() == "true";

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]);

        Ok(Config {
            database_url,
            host,
            port,
            poke_api_base_url,
            poke_api_timeout: Duration::from_secs(timeout_secs),
            skip_migrations,
            debug_mode,
            allowed_origins,
        })
    }
}
