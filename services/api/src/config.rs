//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

pub const DEFAULT_COACHING_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_COACHING_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_SENTIMENT_API_URL: &str =
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub gemini_api_key: String,
    pub coaching_api_base: String,
    pub coaching_model: String,
    pub sentiment_api_url: String,
    pub sentiment_api_token: Option<String>,
    pub session_idle_minutes: i64,
    pub cors_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let session_idle_minutes = match var("SESSION_IDLE_MINUTES") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "SESSION_IDLE_MINUTES".to_string(),
                        format!("'{}' is not a positive number of minutes", raw),
                    ))
                }
            },
            None => 60,
        };

        let cors_origin = var("CORS_ORIGIN");

        // --- Coaching LLM (the API key is a required secret) ---
        let gemini_api_key =
            var("GEMINI_API_KEY").ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;
        let coaching_api_base =
            var("COACHING_API_BASE").unwrap_or_else(|| DEFAULT_COACHING_API_BASE.to_string());
        let coaching_model =
            var("COACHING_MODEL").unwrap_or_else(|| DEFAULT_COACHING_MODEL.to_string());

        // --- Sentiment Classifier ---
        let sentiment_api_url =
            var("SENTIMENT_API_URL").unwrap_or_else(|| DEFAULT_SENTIMENT_API_URL.to_string());
        let sentiment_api_token = var("SENTIMENT_API_TOKEN");

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            coaching_api_base,
            coaching_model,
            sentiment_api_url,
            sentiment_api_token,
            session_idle_minutes,
            cors_origin,
        })
    }
}
