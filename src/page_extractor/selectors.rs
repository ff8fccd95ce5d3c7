//! CSS selectors used by text extraction
//!
//! These are parsed once at first access and cached forever. Hardcoded
//! selectors should NEVER fail to parse; if they do, it's a bug.

use std::sync::LazyLock;

use scraper::Selector;

/// Elements whose subtrees never contribute text
pub(super) const REMOVE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "iframe",
    "svg",
    "nav",
    "footer",
    "header",
    "aside",
    ".advertisement",
    ".ads",
    ".ad",
    ".social-share",
    ".social",
    ".comments",
    ".comment",
    ".sidebar",
    ".cookie-banner",
    ".cookie-consent",
];

/// Main-content containers, highest priority first
pub(super) const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    ".content",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".article-body",
    ".story-body",
    ".content-body",
    "main",
    ".main-content",
    ".post-body",
    ".article-text",
    ".story-content",
    "#content",
    ".news-content",
    "[itemprop=\"articleBody\"]",
];

/// Elements whose boundaries separate lines of text
pub(super) const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

fn parse_all(list: &[&str]) -> Vec<Selector> {
    list.iter()
        .map(|sel| {
            Selector::parse(sel)
                .unwrap_or_else(|e| panic!("BUG: hardcoded CSS selector '{sel}' is invalid: {e}"))
        })
        .collect()
}

pub(super) static REMOVE: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_all(REMOVE_SELECTORS));

pub(super) static MAIN_CONTENT: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_all(MAIN_CONTENT_SELECTORS));

pub(super) static BODY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

pub(super) static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid")
});

pub(super) static H1: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1").expect("BUG: hardcoded CSS selector 'h1' is invalid")
});

pub(super) static H2: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h2").expect("BUG: hardcoded CSS selector 'h2' is invalid")
});

pub(super) static META_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[name=\"description\"]")
        .expect("BUG: hardcoded CSS selector 'meta[name=\"description\"]' is invalid")
});

pub(super) static META_KEYWORDS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[name=\"keywords\"]")
        .expect("BUG: hardcoded CSS selector 'meta[name=\"keywords\"]' is invalid")
});

pub(super) static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[property=\"og:description\"]")
        .expect("BUG: hardcoded CSS selector 'meta[property=\"og:description\"]' is invalid")
});
