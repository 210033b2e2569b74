use std::str::FromStr;

use anyhow::{Context, Result};

use crate::analysis::document::DEFAULT_MAX_INPUT_CHARS;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unparseable values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_input_chars: usize,
    pub analysis_timeout_secs: u64,
    /// JSON vocabulary file; the built-in vocabulary is used when unset.
    pub vocabulary_path: Option<String>,
    /// JSON scoring overrides; defaults are used when unset.
    pub scoring_config_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_input_chars: parse_env_or("MAX_INPUT_CHARS", DEFAULT_MAX_INPUT_CHARS)?,
            analysis_timeout_secs: parse_env_or("ANALYSIS_TIMEOUT_SECS", 10)?,
            vocabulary_path: optional_env("VOCABULARY_PATH"),
            scoring_config_path: optional_env("SCORING_CONFIG_PATH"),
        })
    }

    /// Largest request body accepted: two documents of up to four UTF-8 bytes per
    /// character, plus room for JSON framing and escapes.
    pub fn request_body_limit(&self) -> usize {
        self.max_input_chars
            .saturating_mul(4)
            .saturating_mul(2)
            .saturating_add(64 * 1024)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>()))
}
