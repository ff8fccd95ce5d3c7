//! Google Custom Search JSON API client
//!
//! One GET per query against `{base}/customsearch/v1`. Quota refusals are
//! recognised from structured fields of the error body (HTTP 429,
//! `error.status == RESOURCE_EXHAUSTED` or a quota `reason`), never from
//! message text.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::errors::SearchError;
use super::provider::{SearchProvider, clamp_results, validate_query};
use super::types::SearchResult;
use crate::config::{
    DEFAULT_LANGUAGE_RESTRICT, DEFAULT_SEARCH_BASE_URL, FactCheckConfig, SearchCredentials,
};
use crate::utils::{DEFAULT_SEARCH_TIMEOUT, extract_domain, is_valid_url};

/// `error.errors[].reason` values that mean "quota exhausted"
const QUOTA_REASONS: &[&str] = &[
    "dailyLimitExceeded",
    "quotaExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "dailyLimitExceededUnreg",
];

const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    display_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

impl ApiError {
    fn is_quota(&self) -> bool {
        self.status.as_deref() == Some(RESOURCE_EXHAUSTED)
            || self
                .errors
                .iter()
                .filter_map(|e| e.reason.as_deref())
                .any(|reason| QUOTA_REASONS.contains(&reason))
    }
}

/// Map a non-success response to a [`SearchError`]
fn classify_error(status: StatusCode, body: &str) -> SearchError {
    let api_error = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();

    let message = if api_error.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        api_error.message.clone()
    };

    if status == StatusCode::TOO_MANY_REQUESTS || api_error.is_quota() {
        return SearchError::QuotaExceeded(message);
    }

    SearchError::Http {
        status: status.as_u16(),
        message,
    }
}

// =============================================================================
// Client
// =============================================================================

/// Search client for the Google Custom Search JSON API
#[derive(Debug, Clone)]
pub struct GoogleSearchClient {
    client: reqwest::Client,
    credentials: SearchCredentials,
    base_url: String,
    language_restrict: Option<String>,
}

impl GoogleSearchClient {
    /// Create a client with default endpoint, timeout and language restriction
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(credentials: SearchCredentials) -> Result<Self, SearchError> {
        Self::with_timeout(credentials, DEFAULT_SEARCH_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout(
        credentials: SearchCredentials,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            credentials,
            base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            language_restrict: Some(DEFAULT_LANGUAGE_RESTRICT.to_string()),
        })
    }

    /// Build a client from configuration
    ///
    /// Returns `Ok(None)` when search credentials are not configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &FactCheckConfig) -> Result<Option<Self>, SearchError> {
        let Some(credentials) = config.search_credentials() else {
            return Ok(None);
        };
        let client = Self::new(credentials.clone())?
            .with_base_url(config.search_base_url())
            .with_language_restrict(config.language_restrict().map(str::to_string));
        Ok(Some(client))
    }

    /// Point the client at another endpoint (used against mock servers)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_language_restrict(mut self, lr: Option<String>) -> Self {
        self.language_restrict = lr;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/customsearch/v1", self.base_url)
    }

    async fn execute(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        let query = validate_query(query)?;
        let num = clamp_results(max_results);

        let mut params: Vec<(&str, String)> = vec![
            ("key", self.credentials.api_key.clone()),
            ("cx", self.credentials.engine_id.clone()),
            ("q", query.clone()),
            ("num", num.to_string()),
            ("safe", "medium".to_string()),
        ];
        if let Some(lr) = &self.language_restrict {
            params.push(("lr", lr.clone()));
        }

        debug!(query = %query, num, "Sending custom search request");
        let response = self.client.get(self.endpoint()).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = classify_error(status, &body);
            warn!(query = %query, status = status.as_u16(), error = %error, "Search request failed");
            return Err(error);
        }

        let parsed: CseResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let results: Vec<SearchResult> = parsed
            .items
            .into_iter()
            .filter_map(|item| {
                let link = item.link.filter(|l| is_valid_url(l))?;
                let display_domain = item
                    .display_link
                    .and_then(|d| extract_domain(&d))
                    .or_else(|| extract_domain(&link))
                    .unwrap_or_default();
                Some(SearchResult {
                    title: item.title,
                    snippet: item.snippet,
                    link,
                    display_domain,
                })
            })
            .take(num)
            .collect();

        info!(query = %query, count = results.len(), "Search completed");
        Ok(results)
    }
}

impl SearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.execute(query, max_results).await
    }
}
