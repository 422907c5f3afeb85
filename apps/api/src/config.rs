use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::scoring::ScoringConfig;
use crate::semantic::{DEFAULT_MODEL, DEFAULT_TIMEOUT};

const DEFAULT_BULK_BATCH_LIMIT: usize = 50;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Embeddings endpoint. Unset means the constant fallback score is used.
    pub semantic_service_url: Option<String>,
    pub semantic_model: String,
    pub semantic_api_key: Option<String>,
    pub semantic_timeout: Duration,
    pub bulk_batch_limit: usize,
    pub scoring: ScoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            semantic_service_url: None,
            semantic_model: DEFAULT_MODEL.to_string(),
            semantic_api_key: None,
            semantic_timeout: DEFAULT_TIMEOUT,
            bulk_batch_limit: DEFAULT_BULK_BATCH_LIMIT,
            scoring: ScoringConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let scoring_defaults = ScoringConfig::default();

        let scoring = ScoringConfig {
            must_have_threshold: parse_or(
                &lookup,
                "MUST_HAVE_THRESHOLD",
                scoring_defaults.must_have_threshold,
            )?,
            nice_to_have_threshold: parse_or(
                &lookup,
                "NICE_TO_HAVE_THRESHOLD",
                scoring_defaults.nice_to_have_threshold,
            )?,
            years_per_entry: parse_or(&lookup, "YEARS_PER_ENTRY", scoring_defaults.years_per_entry)?,
            ..scoring_defaults
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            semantic_service_url: non_empty(lookup("SEMANTIC_SERVICE_URL")),
            semantic_model: non_empty(lookup("SEMANTIC_MODEL")).unwrap_or(defaults.semantic_model),
            semantic_api_key: non_empty(lookup("SEMANTIC_API_KEY")),
            semantic_timeout: Duration::from_millis(parse_or(
                &lookup,
                "SEMANTIC_TIMEOUT_MS",
                defaults.semantic_timeout.as_millis() as u64,
            )?),
            bulk_batch_limit: parse_or(&lookup, "BULK_BATCH_LIMIT", defaults.bulk_batch_limit)?,
            scoring,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
