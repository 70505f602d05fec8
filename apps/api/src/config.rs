use thiserror::Error;

use crate::assistant::truncate::GLOBAL_TOKEN_BUDGET;

/// Fallback store location when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:chief.db?mode=rwc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    MissingVar(&'static str),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
/// Startup aborts if the completion API credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub bind_addr: String,
    pub port: u16,
    /// Token ceiling for one completion request.
    pub token_budget: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };
        let token_budget = match lookup("TOKEN_BUDGET") {
            Some(raw) => raw.parse::<usize>().map_err(|e| ConfigError::Invalid {
                key: "TOKEN_BUDGET",
                reason: e.to_string(),
            })?,
            None => GLOBAL_TOKEN_BUDGET,
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            openai_api_key: require(&lookup, "OPENAI_API_KEY")?,
            openai_base_url: lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            token_budget,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))
}
