//! Type-safe builder for `FactCheckConfig` using the typestate pattern
//!
//! The judgment API key is the one value without a sensible default, so the
//! builder only exposes `build()` once it has been provided.

use std::marker::PhantomData;

use crate::utils::{
    DEFAULT_BACKOFF_BASE, DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_CONCURRENCY,
    DEFAULT_FETCH_TIMEOUT, DEFAULT_GEMINI_MODEL, DEFAULT_JUDGMENT_TIMEOUT, DEFAULT_QUERY_DELAY,
};

use super::types::{FactCheckConfig, PipelineSettings, SearchCredentials};

/// Default endpoint of the generative language API
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default endpoint of the custom search API
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.googleapis.com";

/// Default language restriction for search queries
pub const DEFAULT_LANGUAGE_RESTRICT: &str = "lang_vi|lang_en";

/// Invalid combinations detected by [`FactCheckConfigBuilder::build`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("judgment API key must not be empty")]
    EmptyApiKey,

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

// Type states for the builder
pub struct WithApiKey;

pub struct FactCheckConfigBuilder<State = ()> {
    pub(crate) gemini_api_key: Option<String>,
    pub(crate) gemini_model: String,
    pub(crate) gemini_base_url: String,
    pub(crate) judgment_timeout_secs: u64,
    pub(crate) temperature: f32,
    pub(crate) search: Option<SearchCredentials>,
    pub(crate) search_base_url: String,
    pub(crate) language_restrict: Option<String>,
    pub(crate) fetch_timeout_secs: u64,
    pub(crate) fetch_attempts: u32,
    pub(crate) fetch_concurrency: usize,
    pub(crate) backoff_base_ms: u64,
    pub(crate) query_delay_ms: u64,
    pub(crate) settings: PipelineSettings,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for FactCheckConfigBuilder<()> {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            judgment_timeout_secs: DEFAULT_JUDGMENT_TIMEOUT.as_secs(),
            temperature: 0.2,
            search: None,
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            language_restrict: Some(DEFAULT_LANGUAGE_RESTRICT.to_string()),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            fetch_attempts: DEFAULT_FETCH_ATTEMPTS,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            backoff_base_ms: u64::try_from(DEFAULT_BACKOFF_BASE.as_millis()).unwrap_or(2_000),
            query_delay_ms: u64::try_from(DEFAULT_QUERY_DELAY.as_millis()).unwrap_or(500),
            settings: PipelineSettings::default(),
            _phantom: PhantomData,
        }
    }
}

impl FactCheckConfig {
    /// Create a builder for configuring a `FactCheckConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> FactCheckConfigBuilder<()> {
        FactCheckConfigBuilder::default()
    }
}

impl FactCheckConfigBuilder<()> {
    pub fn gemini_api_key(self, key: impl Into<String>) -> FactCheckConfigBuilder<WithApiKey> {
        FactCheckConfigBuilder {
            gemini_api_key: Some(key.into()),
            gemini_model: self.gemini_model,
            gemini_base_url: self.gemini_base_url,
            judgment_timeout_secs: self.judgment_timeout_secs,
            temperature: self.temperature,
            search: self.search,
            search_base_url: self.search_base_url,
            language_restrict: self.language_restrict,
            fetch_timeout_secs: self.fetch_timeout_secs,
            fetch_attempts: self.fetch_attempts,
            fetch_concurrency: self.fetch_concurrency,
            backoff_base_ms: self.backoff_base_ms,
            query_delay_ms: self.query_delay_ms,
            settings: self.settings,
            _phantom: PhantomData,
        }
    }
}

impl FactCheckConfigBuilder<WithApiKey> {
    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is blank or a count that drives
    /// a loop or a fan-out is zero.
    pub fn build(self) -> Result<FactCheckConfig, ConfigError> {
        let gemini_api_key = self
            .gemini_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::EmptyApiKey)?;

        if self.fetch_attempts == 0 {
            return Err(ConfigError::Zero {
                field: "fetch_attempts",
            });
        }
        if self.fetch_concurrency == 0 {
            return Err(ConfigError::Zero {
                field: "fetch_concurrency",
            });
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                field: "fetch_timeout_secs",
            });
        }

        // Blank credentials mean "not configured", never a request with an empty key
        let search = self.search.filter(|c| {
            !c.api_key.trim().is_empty() && !c.engine_id.trim().is_empty()
        });

        Ok(FactCheckConfig {
            gemini_api_key,
            gemini_model: self.gemini_model,
            gemini_base_url: self.gemini_base_url,
            judgment_timeout_secs: self.judgment_timeout_secs,
            temperature: self.temperature,
            search,
            search_base_url: self.search_base_url,
            language_restrict: self.language_restrict,
            fetch_timeout_secs: self.fetch_timeout_secs,
            fetch_attempts: self.fetch_attempts,
            fetch_concurrency: self.fetch_concurrency,
            backoff_base_ms: self.backoff_base_ms,
            query_delay_ms: self.query_delay_ms,
            settings: self.settings,
        })
    }
}

impl<State> FactCheckConfigBuilder<State> {
    #[must_use]
    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = model.into();
        self
    }

    #[must_use]
    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = url.into();
        self
    }

    #[must_use]
    pub fn judgment_timeout_secs(mut self, secs: u64) -> Self {
        self.judgment_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable search-driven flows
    ///
    /// # Example
    ///
    /// ```
    /// # use kodegen_tools_factcheck::config::FactCheckConfig;
    /// let config = FactCheckConfig::builder()
    ///     .search_credentials("search-key", "engine-id")
    ///     .gemini_api_key("gemini-key")
    ///     .build()
    ///     .expect("valid config");
    /// assert!(config.search_enabled());
    /// ```
    #[must_use]
    pub fn search_credentials(
        mut self,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        self.search = Some(SearchCredentials {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        });
        self
    }

    #[must_use]
    pub fn search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_base_url = url.into();
        self
    }

    /// Restrict search results to languages (`None` lifts the restriction)
    #[must_use]
    pub fn language_restrict(mut self, lr: Option<String>) -> Self {
        self.language_restrict = lr;
        self
    }

    #[must_use]
    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Total HTTP attempts per page, first attempt included
    #[must_use]
    pub fn fetch_attempts(mut self, attempts: u32) -> Self {
        self.fetch_attempts = attempts;
        self
    }

    #[must_use]
    pub fn fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn backoff_base_ms(mut self, ms: u64) -> Self {
        self.backoff_base_ms = ms;
        self
    }

    #[must_use]
    pub fn query_delay_ms(mut self, ms: u64) -> Self {
        self.query_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }
}
