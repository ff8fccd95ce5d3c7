//! Getter methods for `FactCheckConfig`

use std::time::Duration;

use super::types::{FactCheckConfig, PipelineSettings, SearchCredentials};

impl FactCheckConfig {
    #[must_use]
    pub fn gemini_api_key(&self) -> &str {
        &self.gemini_api_key
    }

    #[must_use]
    pub fn gemini_model(&self) -> &str {
        &self.gemini_model
    }

    #[must_use]
    pub fn gemini_base_url(&self) -> &str {
        &self.gemini_base_url
    }

    #[must_use]
    pub fn judgment_timeout(&self) -> Duration {
        Duration::from_secs(self.judgment_timeout_secs)
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    #[must_use]
    pub fn search_credentials(&self) -> Option<&SearchCredentials> {
        self.search.as_ref()
    }

    /// Whether both search credentials are present
    #[must_use]
    pub fn search_enabled(&self) -> bool {
        self.search.is_some()
    }

    #[must_use]
    pub fn search_base_url(&self) -> &str {
        &self.search_base_url
    }

    #[must_use]
    pub fn language_restrict(&self) -> Option<&str> {
        self.language_restrict.as_deref()
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn fetch_attempts(&self) -> u32 {
        self.fetch_attempts
    }

    #[must_use]
    pub fn fetch_concurrency(&self) -> usize {
        self.fetch_concurrency
    }

    #[must_use]
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    #[must_use]
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }
}
