//! Core configuration types for claim verification
//!
//! This module contains the main `FactCheckConfig` struct and the pipeline
//! tunables that define how many queries, results and pages each phase uses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::REDACTED;

/// Credentials for the custom search API
///
/// Both values are required; a half-configured search backend is treated the
/// same as no search backend at all.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &REDACTED)
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

/// Main configuration struct for the verification pipeline
#[derive(Clone, Serialize, Deserialize)]
pub struct FactCheckConfig {
    /// API key for the judgment model. The only mandatory value.
    #[serde(skip_serializing)]
    pub(crate) gemini_api_key: String,
    pub(crate) gemini_model: String,
    pub(crate) gemini_base_url: String,
    pub(crate) judgment_timeout_secs: u64,
    pub(crate) temperature: f32,

    /// `None` disables every search-driven flow
    #[serde(skip_serializing)]
    pub(crate) search: Option<SearchCredentials>,
    pub(crate) search_base_url: String,
    /// Value of the `lr` parameter, e.g. `lang_vi|lang_en`
    pub(crate) language_restrict: Option<String>,

    pub(crate) fetch_timeout_secs: u64,
    pub(crate) fetch_attempts: u32,
    pub(crate) fetch_concurrency: usize,
    pub(crate) backoff_base_ms: u64,
    pub(crate) query_delay_ms: u64,

    pub(crate) settings: PipelineSettings,
}

impl fmt::Debug for FactCheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactCheckConfig")
            .field("gemini_api_key", &REDACTED)
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("judgment_timeout_secs", &self.judgment_timeout_secs)
            .field("temperature", &self.temperature)
            .field("search", &self.search)
            .field("search_base_url", &self.search_base_url)
            .field("language_restrict", &self.language_restrict)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_attempts", &self.fetch_attempts)
            .field("fetch_concurrency", &self.fetch_concurrency)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("query_delay_ms", &self.query_delay_ms)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Per-phase tunables of the evidence pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSettings {
    /// Results requested for each phase-1 query (URL flow)
    pub first_results_per_query: usize,
    /// Phase-1 queries actually issued
    pub first_max_queries: usize,
    /// Ranked phase-1 results that get fetched
    pub first_fetch_top: usize,

    pub second_results_per_query: usize,
    pub second_max_queries: usize,
    pub second_fetch_top: usize,

    /// Results requested for each query of the text flow
    pub text_results_per_query: usize,
    pub text_max_queries: usize,
    pub text_fetch_top: usize,

    /// Claim prefix used as the primary text query
    pub text_query_chars: usize,
    /// Claim prefix used by the quoted and suffixed text queries
    pub text_short_query_chars: usize,

    /// Sources longer than this take part in the deep evidence pass
    pub deep_analysis_min_chars: usize,
    pub deep_analysis_enabled: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            first_results_per_query: 6,
            first_max_queries: 3,
            first_fetch_top: 5,
            second_results_per_query: 6,
            second_max_queries: 5,
            second_fetch_top: 5,
            text_results_per_query: 8,
            text_max_queries: 4,
            text_fetch_top: 8,
            text_query_chars: 200,
            text_short_query_chars: 100,
            deep_analysis_min_chars: 200,
            deep_analysis_enabled: true,
        }
    }
}
