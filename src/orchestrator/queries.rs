//! Search query sets for each phase
//!
//! Every builder lists its candidates in priority order, drops the ones with
//! fewer than [`MIN_QUERY_CHARS`] characters and keeps the first `max`.

use crate::evidence::TopicProfile;
use crate::utils::{MIN_QUERY_CHARS, char_len, safe_truncate_chars};

fn usable(candidates: Vec<String>, max: usize) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|q| char_len(q) >= MIN_QUERY_CHARS)
        .take(max)
        .collect()
}

/// Phase 1: the URL keywords, quoted and with news suffixes
#[must_use]
pub fn first_phase_queries(keywords: &str, max: usize) -> Vec<String> {
    let kw = keywords.trim();
    usable(
        vec![
            kw.to_string(),
            format!("\"{kw}\""),
            format!("{kw} tin tức"),
            format!("{kw} news"),
        ],
        max,
    )
}

/// Phase 2: the identified title and key topics
#[must_use]
pub fn second_phase_queries(topic: &TopicProfile, max: usize) -> Vec<String> {
    let title = topic.main_title();
    let topics = topic.joined_topics();
    usable(
        vec![
            title.to_string(),
            format!("\"{title}\""),
            topics.clone(),
            format!("{title} fact check"),
            format!("{topics} xác minh"),
            format!("{title} tin tức"),
        ],
        max,
    )
}

/// Text flow: prefixes of the claim itself
#[must_use]
pub fn text_queries(claim: &str, primary_chars: usize, short_chars: usize, max: usize) -> Vec<String> {
    let claim = claim.trim();
    let primary = safe_truncate_chars(claim, primary_chars).trim_end();
    let short = safe_truncate_chars(claim, short_chars).trim_end();
    usable(
        vec![
            primary.to_string(),
            format!("\"{short}\""),
            format!("{short} fact check"),
            format!("{short} tin tức"),
        ],
        max,
    )
}
