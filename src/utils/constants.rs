//! Shared configuration constants for factcheck
//!
//! This module contains default values and thresholds used throughout the
//! evidence pipeline to ensure consistency and avoid magic numbers.

use std::time::Duration;

/// Browser user agents rotated across page fetches
///
/// Updated: 2025-01-29 to Chrome 132 (current stable) / Firefox 134 / Safari 18.
/// Rotating between a handful of common desktop agents lowers the block rate
/// on news sites that fingerprint repeated identical agents.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:134.0) Gecko/20100101 Firefox/134.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_7_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.2 Safari/605.1.15",
];

/// `Accept-Language` sent with page fetches (Vietnamese first, English second)
pub const ACCEPT_LANGUAGE: &str = "vi-VN,vi;q=0.9,en;q=0.8";

/// `Accept` header sent with page fetches
pub const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Per-fetch timeout: 20 seconds
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Maximum redirects followed for a single page fetch
pub const MAX_REDIRECTS: usize = 5;

/// Maximum page body accepted by the fetcher (10 MB)
///
/// Same ceiling the HTML preprocessing applies to its input; anything larger
/// is almost certainly not an article.
pub const MAX_PAGE_BYTES: usize = 10 * 1024 * 1024;

/// Default number of HTTP attempts per page (first attempt included)
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 1;

/// Base delay for fetch retries, multiplied by the attempt number
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Default number of pages fetched simultaneously
pub const DEFAULT_FETCH_CONCURRENCY: usize = 5;

/// Fixed delay between consecutive search queries
///
/// The search API is rate limited per project; serialising queries with a
/// short pause keeps bursts under the per-second ceiling.
pub const DEFAULT_QUERY_DELAY: Duration = Duration::from_millis(500);

/// Text extraction: a main-content container must exceed this many chars
pub const MIN_MAIN_CONTENT_CHARS: usize = 100;

/// Text extraction: below this, whole-document text is used instead of body
pub const MIN_BODY_CHARS: usize = 50;

/// Fetching: body text shorter than this triggers metadata fallback
pub const MIN_USEFUL_TEXT_CHARS: usize = 50;

/// Fetching: metadata fallback must exceed this many chars to be accepted
pub const MIN_FALLBACK_TEXT_CHARS: usize = 30;

/// Maximum results a single search request may return (API hard limit)
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Maximum query length sent to the search API (in characters)
pub const MAX_QUERY_LENGTH: usize = 2048;

/// Queries this short carry no signal and are never issued
pub const MIN_QUERY_CHARS: usize = 4;

/// Keyword used when nothing usable can be derived from a URL ("latest news")
pub const DEFAULT_KEYWORDS: &str = "tin tức mới";

/// Lower-case Vietnamese letters carrying diacritics
///
/// Their presence in a URL segment is a strong hint that the segment is a
/// natural-language slug rather than an opaque identifier.
pub const VIETNAMESE_LETTERS: &str =
    "áàảãạăắằẳẵặâấầẩẫậéèẻẽẹêếềểễệíìỉĩịóòỏõọôốồổỗộơớờởỡợúùủũụưứừửữựýỳỷỹỵđ";

/// Length of the source preview exposed in analysis reports
pub const PREVIEW_CHARS: usize = 300;

/// Default judgment model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Timeout for a single judgment call
pub const DEFAULT_JUDGMENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum entries kept by the in-memory history store
pub const MAX_HISTORY_ITEMS: usize = 100;

/// Timeout for a single search API request
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Title recorded for pages that have neither `<title>` nor `<h1>` ("untitled")
pub const UNTITLED: &str = "Không có tiêu đề";

/// Placeholder printed instead of secrets in `Debug` output
pub const REDACTED: &str = "<redacted>";
