//! Environment loading for `FactCheckConfig`
//!
//! Variables:
//! - `GEMINI_API_KEY` (required)
//! - `GEMINI_MODEL`
//! - `GOOGLE_SEARCH_API_KEY` + `GOOGLE_SEARCH_ENGINE_ID` (both needed to enable search)
//! - `FACTCHECK_FETCH_TIMEOUT_SECS`
//! - `FACTCHECK_FETCH_CONCURRENCY`
//! - `FACTCHECK_QUERY_DELAY_MS`

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use super::builder::ConfigError;
use super::types::FactCheckConfig;

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_SEARCH_API_KEY: &str = "GOOGLE_SEARCH_API_KEY";
pub const ENV_SEARCH_ENGINE_ID: &str = "GOOGLE_SEARCH_ENGINE_ID";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FACTCHECK_FETCH_TIMEOUT_SECS";
pub const ENV_FETCH_CONCURRENCY: &str = "FACTCHECK_FETCH_CONCURRENCY";
pub const ENV_QUERY_DELAY_MS: &str = "FACTCHECK_QUERY_DELAY_MS";

impl FactCheckConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Fails when `GEMINI_API_KEY` is missing or a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Lets tests supply variables without touching the process environment.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FactCheckConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_GEMINI_API_KEY)
            .ok_or_else(|| anyhow!("{ENV_GEMINI_API_KEY} is not set"))?;

        let mut builder = FactCheckConfig::builder().gemini_api_key(api_key);

        if let Some(model) = non_empty(ENV_GEMINI_MODEL) {
            builder = builder.gemini_model(model.trim());
        }

        if let (Some(key), Some(cx)) = (non_empty(ENV_SEARCH_API_KEY), non_empty(ENV_SEARCH_ENGINE_ID)) {
            builder = builder.search_credentials(key.trim(), cx.trim());
        }

        if let Some(raw) = non_empty(ENV_FETCH_TIMEOUT_SECS) {
            builder = builder.fetch_timeout_secs(parse_var(ENV_FETCH_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = non_empty(ENV_FETCH_CONCURRENCY) {
            builder = builder.fetch_concurrency(parse_var(ENV_FETCH_CONCURRENCY, &raw)?);
        }
        if let Some(raw) = non_empty(ENV_QUERY_DELAY_MS) {
            builder = builder.query_delay_ms(parse_var(ENV_QUERY_DELAY_MS, &raw)?);
        }

        builder
            .build()
            .context("Invalid configuration from environment")
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
