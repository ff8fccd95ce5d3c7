//! Metadata fallback for pages whose body yields almost no text.
//!
//! Script-rendered news pages often ship an empty shell plus rich `<meta>`
//! tags; title, headings and descriptions are still enough evidence to cite.

use scraper::{Html, Selector};

use super::selectors::{H1, H2, META_DESCRIPTION, META_KEYWORDS, OG_DESCRIPTION};
use super::text::{title_from_document, within_size_limit};

/// Text assembled from a document's title, headings and meta tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFallback {
    pub title: String,
    pub h1: String,
    pub h2: String,
    pub description: String,
    pub og_description: String,
    pub keywords: String,
}

impl MetadataFallback {
    /// Non-empty parts joined by blank lines, in field order
    #[must_use]
    pub fn combined(&self) -> String {
        [
            &self.title,
            &self.h1,
            &self.h2,
            &self.description,
            &self.og_description,
            &self.keywords,
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
    }

    /// Best available title: `<title>`, else the first `<h1>`
    #[must_use]
    pub fn best_title(&self) -> &str {
        if self.title.is_empty() {
            &self.h1
        } else {
            &self.title
        }
    }
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn first_content_attr(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .find_map(|el| el.value().attr("content"))
        .map(|c| c.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

pub(super) fn metadata_from_document(document: &Html) -> MetadataFallback {
    MetadataFallback {
        title: title_from_document(document),
        h1: first_text(document, &H1),
        h2: first_text(document, &H2),
        description: first_content_attr(document, &META_DESCRIPTION),
        og_description: first_content_attr(document, &OG_DESCRIPTION),
        keywords: first_content_attr(document, &META_KEYWORDS),
    }
}

/// Gather title, first h1, first h2, meta description, og:description and
/// meta keywords from `html`
#[must_use]
pub fn extract_metadata_fallback(html: &str) -> MetadataFallback {
    if html.trim().is_empty() || !within_size_limit(html) {
        return MetadataFallback::default();
    }
    metadata_from_document(&Html::parse_document(html))
}
