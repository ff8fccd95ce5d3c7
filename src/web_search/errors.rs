//! Error types for search operations

use thiserror::Error;

/// Error types for search operations
///
/// `QuotaExceeded` ends the whole query round; any other error costs only
/// the query that raised it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The provider refused the request because a usage quota is exhausted
    #[error("Search quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Query rejected before any request was made
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// Non-success HTTP status other than a quota refusal
    #[error("Search API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport failure (DNS, connect, timeout, reset)
    #[error("Search request failed: {0}")]
    Network(String),

    /// Response body could not be understood
    #[error("Invalid search response: {0}")]
    InvalidResponse(String),
}

impl SearchError {
    /// Check if error is the quota signal that aborts a query loop
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, SearchError::QuotaExceeded(_))
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            SearchError::InvalidResponse(error.to_string())
        } else {
            SearchError::Network(error.to_string())
        }
    }
}
