//! Data structures for web search functionality

use serde::{Deserialize, Serialize};

use crate::utils::extract_domain;

/// A single search hit
///
/// `link` is the identity of a result: two results with the same link are the
/// same result regardless of title or snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Page title
    pub title: String,

    /// Description snippet from the search provider
    pub snippet: String,

    /// Absolute page URL
    pub link: String,

    /// Host shown by the provider (e.g. `vnexpress.net`)
    pub display_domain: String,
}

impl SearchResult {
    /// Create a result, deriving `display_domain` from the link
    #[must_use]
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, link: impl Into<String>) -> Self {
        let link = link.into();
        let display_domain = extract_domain(&link).unwrap_or_default();
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link,
            display_domain,
        }
    }

    /// Override the display domain reported by the provider
    #[must_use]
    pub fn with_display_domain(mut self, display_domain: impl Into<String>) -> Self {
        self.display_domain = display_domain.into();
        self
    }
}
