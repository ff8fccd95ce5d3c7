//! The search seam used by the orchestrator

use std::future::Future;
use std::sync::Arc;

use super::errors::SearchError;
use super::types::SearchResult;
use crate::utils::{MAX_QUERY_LENGTH, MAX_SEARCH_RESULTS, safe_truncate_chars};

/// A web search backend
///
/// Implementations return at most `min(max_results, 10)` results. An empty
/// vector means "no hits" and is never used to signal quota exhaustion.
pub trait SearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

impl<T: SearchProvider> SearchProvider for Arc<T> {
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send {
        (**self).search(query, max_results)
    }
}

impl<T: SearchProvider> SearchProvider for &T {
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send {
        (**self).search(query, max_results)
    }
}

/// Validate a query before spending a request on it
///
/// Trims whitespace, rejects empty queries and truncates to
/// [`MAX_QUERY_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`SearchError::InvalidQuery`] for empty or whitespace-only input.
pub fn validate_query(query: &str) -> Result<String, SearchError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SearchError::InvalidQuery(
            "Search query cannot be empty or whitespace-only".to_string(),
        ));
    }
    Ok(safe_truncate_chars(trimmed, MAX_QUERY_LENGTH).trim_end().to_string())
}

/// Clamp a requested result count to what one request may return
#[inline]
#[must_use]
pub fn clamp_results(max_results: usize) -> usize {
    max_results.clamp(1, MAX_SEARCH_RESULTS)
}
