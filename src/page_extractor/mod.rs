//! Text extraction from fetched HTML pages.
//!
//! This module turns raw HTML into the plain text the judgment model reads:
//! 1. Strips scripts, navigation, ads, comments and other non-content subtrees
//! 2. Tries semantic main-content containers in priority order
//! 3. Falls back to `<body>`, then to the whole document
//! 4. Normalises whitespace, one line per block, duplicates dropped
//!
//! All functions are pure and never fail; problems yield empty strings.

mod metadata;
mod selectors;
mod text;

pub use metadata::{MetadataFallback, extract_metadata_fallback};
pub use text::{extract_body, extract_title, normalize_text};

use scraper::Html;

/// Everything the fetcher needs from one document, parsed once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub body_text: String,
    pub metadata: MetadataFallback,
}

/// Parse `html` once and extract title, body text and metadata fallback
#[must_use]
pub fn extract_page(html: &str) -> ExtractedPage {
    if html.trim().is_empty() || !text::within_size_limit(html) {
        return ExtractedPage::default();
    }
    let document = Html::parse_document(html);
    let metadata = metadata::metadata_from_document(&document);
    ExtractedPage {
        title: metadata.title.clone(),
        body_text: text::body_from_document(&document),
        metadata,
    }
}
