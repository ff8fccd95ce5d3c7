//! Web search functionality
//!
//! Defines the [`SearchProvider`] seam the orchestrator searches through and
//! a Google Custom Search implementation of it. Returns structured results
//! with titles, links, snippets and display domains.

mod errors;
mod google;
mod provider;
mod types;

// Re-export public types
pub use errors::SearchError;
pub use google::GoogleSearchClient;
pub use provider::{SearchProvider, clamp_results, validate_query};
pub use types::SearchResult;
