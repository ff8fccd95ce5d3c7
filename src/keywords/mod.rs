//! Search keyword derivation from article URLs
//!
//! News URLs usually carry a human-readable slug
//! (`/bao-so-3-do-bo-vao-quang-ninh-4791234.html`) next to opaque IDs and
//! category names. Each path segment is scored and the most slug-like one is
//! cleaned into a space-separated keyword string.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use url::Url;

use crate::utils::{DEFAULT_KEYWORDS, VIETNAMESE_LETTERS, collapse_whitespace, extract_domain};

/// Segments shorter than this (in chars) are never candidates
const MIN_SEGMENT_CHARS: usize = 5;

/// MSN article URLs put the category right before the slug
const MSN_CATEGORIES: &[&str] = &[
    "lifestyle",
    "sports",
    "news",
    "entertainment",
    "health",
    "technology",
];

/// File extensions dropped from the last segment by the generic fallback
const WEB_EXTENSIONS: &[&str] = &[".html", ".htm", ".php", ".aspx", ".amp"];

static OPAQUE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{10,}$").expect("BUG: hardcoded opaque-id regex is invalid")
});

static PERCENT_REMNANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%[0-9A-Fa-f]{2}").expect("BUG: hardcoded percent-escape regex is invalid")
});

/// Derives search keywords from a URL or bare path
///
/// Extraction never fails: the worst case is the fixed default keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract a non-empty keyword string from `url_or_path`
    ///
    /// # Arguments
    ///
    /// * `url_or_path` - An absolute URL or a `/`-separated path. Percent
    ///   escapes are decoded first; undecodable input is used as-is.
    #[must_use]
    pub fn extract(&self, url_or_path: &str) -> String {
        let input = url_or_path.trim();
        let segments = candidate_segments(input);

        let mut best: Option<(&str, u32)> = None;
        for segment in &segments {
            let Some(score) = score_segment(segment) else {
                continue;
            };
            debug!("keyword segment {segment:?} scored {score}");
            // Strictly greater: the first segment wins ties
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((segment.as_str(), score));
            }
        }

        if let Some((segment, score)) = best {
            let cleaned = clean_segment(segment);
            if !cleaned.is_empty() {
                debug!("keywords {cleaned:?} from segment scoring {score}");
                return cleaned;
            }
        }

        let fallback = msn_fallback(input, &segments).or_else(|| generic_fallback(&segments));
        match fallback {
            Some(keywords) => {
                debug!("keywords {keywords:?} from fallback");
                keywords
            }
            None => DEFAULT_KEYWORDS.to_string(),
        }
    }
}

/// Convenience wrapper around [`KeywordExtractor::extract`]
#[must_use]
pub fn extract_keywords(url_or_path: &str) -> String {
    KeywordExtractor.extract(url_or_path)
}

/// Score a single path segment
///
/// Returns `None` for segments that can never be keywords: shorter than five
/// characters or made only of digits.
///
/// | signal | points |
/// |---|---|
/// | contains a Vietnamese accented letter | +10 |
/// | each `-`/`_` delimited word | +1 |
/// | between 21 and 199 chars | +5 |
/// | no `=`, `?` or `&` | +3 |
/// | not a 10+ char alphanumeric run | +2 |
#[must_use]
pub fn score_segment(segment: &str) -> Option<u32> {
    let len = segment.chars().count();
    if len < MIN_SEGMENT_CHARS || segment.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut score = 0u32;
    if segment.chars().any(is_vietnamese_letter) {
        score += 10;
    }
    let words = segment.split(['-', '_']).count();
    score += u32::try_from(words).unwrap_or(u32::MAX);
    if len > 20 && len < 200 {
        score += 5;
    }
    if !segment.contains(['=', '?', '&']) {
        score += 3;
    }
    if !OPAQUE_ID.is_match(segment) {
        score += 2;
    }
    Some(score)
}

/// Turn a winning segment into keywords
///
/// Delimiters become spaces, leftover `%XX` escapes are removed and any
/// character that is not alphanumeric ASCII, whitespace or a Vietnamese letter
/// is replaced before whitespace is collapsed.
#[must_use]
pub fn clean_segment(segment: &str) -> String {
    let spaced = segment.replace(['-', '_'], " ");
    let without_escapes = PERCENT_REMNANT.replace_all(&spaced, " ");
    let kept: String = without_escapes
        .chars()
        .map(|c| if is_keyword_char(c) { c } else { ' ' })
        .collect();
    collapse_whitespace(&kept)
}

fn is_vietnamese_letter(c: char) -> bool {
    c.to_lowercase().any(|l| VIETNAMESE_LETTERS.contains(l))
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || is_vietnamese_letter(c)
}

fn percent_decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Split the input into decoded path segments
///
/// For absolute URLs only the path competes; scheme, host and query are not
/// candidates.
fn candidate_segments(input: &str) -> Vec<String> {
    if let Ok(url) = Url::parse(input)
        && matches!(url.scheme(), "http" | "https")
    {
        return url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(percent_decode)
                    .collect()
            })
            .unwrap_or_default();
    }

    percent_decode(input)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn msn_fallback(input: &str, segments: &[String]) -> Option<String> {
    let domain = extract_domain(input)?;
    if !domain.contains("msn.com") {
        return None;
    }
    let idx = segments
        .iter()
        .position(|s| MSN_CATEGORIES.contains(&s.as_str()))?;
    let next = segments.get(idx + 1)?;
    let keywords = collapse_whitespace(&format!("{} {}", segments[idx], fallback_clean(next)));
    (!keywords.is_empty()).then_some(keywords)
}

fn generic_fallback(segments: &[String]) -> Option<String> {
    let last = segments.last()?;
    let stem = WEB_EXTENSIONS
        .iter()
        .find_map(|ext| {
            let cut = last.len().checked_sub(ext.len())?;
            (last.is_char_boundary(cut) && last[cut..].eq_ignore_ascii_case(ext))
                .then(|| &last[..cut])
        })
        .unwrap_or(last);
    let keywords = fallback_clean(stem);
    (!keywords.is_empty()).then_some(keywords)
}

/// Cleaning used by the fallbacks: hyphens survive
fn fallback_clean(segment: &str) -> String {
    let kept: String = segment
        .chars()
        .map(|c| if is_keyword_char(c) || c == '-' { c } else { ' ' })
        .collect();
    collapse_whitespace(&kept)
}
