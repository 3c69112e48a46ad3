//! Promotion engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PROMOTIONS_DATABASE_URL` - `PostgreSQL` connection string
//! - `PROMOTIONS_CHANNEL_ID` - Channel the promotion queries are scoped to
//!
//! ## Optional
//! - `PROMOTION_CACHE_TTL_MS` - Time-to-live of the cached active-promotion
//!   list in milliseconds (default: 30000). Activation windows are checked
//!   against `now - ttl` so a promotion does not flicker off before the
//!   cache expires; this staleness tolerance is correctness-affecting and
//!   must stay configurable.
//! - `PROMOTIONS_DEFAULT_LANGUAGE` - Fallback language for promotion
//!   translations (default: en)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use bramble_core::{ChannelId, LanguageCode};

const DEFAULT_CACHE_TTL_MS: u64 = 30_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Promotion engine configuration.
#[derive(Debug, Clone)]
pub struct PromotionsConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Channel the promotion queries are scoped to
    pub channel_id: ChannelId,
    /// TTL of the cached active-promotion list
    pub cache_ttl: Duration,
    /// Fallback language for promotion translations
    pub default_language: LanguageCode,
}

impl PromotionsConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `.env` via `dotenvy` first, so local development works without
    /// exporting variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = require("PROMOTIONS_DATABASE_URL")?;
        let channel_id = require("PROMOTIONS_CHANNEL_ID")?
            .parse::<ChannelId>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PROMOTIONS_CHANNEL_ID".to_string(), e.to_string())
            })?;

        let cache_ttl_ms = match std::env::var("PROMOTION_CACHE_TTL_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("PROMOTION_CACHE_TTL_MS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_CACHE_TTL_MS,
        };

        let default_language = match std::env::var("PROMOTIONS_DEFAULT_LANGUAGE") {
            Ok(raw) => LanguageCode::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("PROMOTIONS_DEFAULT_LANGUAGE".to_string(), e.to_string())
            })?,
            Err(_) => LanguageCode::en(),
        };

        Ok(Self {
            database_url: SecretString::from(database_url),
            channel_id,
            cache_ttl: Duration::from_millis(cache_ttl_ms),
            default_language,
        })
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}
