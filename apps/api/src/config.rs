use std::time::Duration;

use anyhow::{Context, Result};

const SECS_PER_HOUR: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub supabase_jwt_secret: String,
    /// Key for the default provider, used when a user has no stored AI settings.
    pub gemini_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub cache_ttl_hours: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            database_url: require_env("DATABASE_URL")?,
            supabase_jwt_secret: require_env("SUPABASE_JWT_SECRET")?,
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cache_ttl_hours: std::env::var("CACHE_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse::<u64>()
                .context("CACHE_TTL_HOURS must be a whole number of hours")?,
        };
        config.cache_ttl()?;
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Result<Duration> {
        self.cache_ttl_hours
            .checked_mul(SECS_PER_HOUR)
            .map(Duration::from_secs)
            .with_context(|| format!("CACHE_TTL_HOURS={} is too large", self.cache_ttl_hours))
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cache_ttl_hours: u64) -> Config {
        Config {
            database_url: "postgres://localhost/resumyx_test".to_string(),
            supabase_jwt_secret: "secret".to_string(),
            gemini_api_key: None,
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            cache_ttl_hours,
        }
    }

    #[test]
    fn test_cache_ttl_in_seconds() {
        assert_eq!(config(24).cache_ttl().unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_cache_ttl_overflow_is_an_error() {
        let err = config(u64::MAX).cache_ttl().unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
