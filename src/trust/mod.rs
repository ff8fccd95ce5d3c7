//! Deduplication and trust ranking of search results
//!
//! Ranking is a static allow/deny list, not a relevance model:
//! 1. Duplicate links are dropped (first occurrence wins)
//! 2. Results from denylisted domains are dropped
//! 3. Allowlisted domains move to the front; relative order is otherwise kept
//!
//! Domains match by host suffix on label boundaries: `bbc.com` matches
//! `bbc.com` and `news.bbc.com`, never `notbbc.com`.

use std::collections::HashSet;

use log::debug;

use crate::utils::{extract_domain, host_matches};
use crate::web_search::SearchResult;

/// Domains whose results are preferred
pub const DEFAULT_ALLOWLIST: &[&str] = &[
    "wikipedia.org",
    "gov.vn",
    "edu.vn",
    "bbc.com",
    "cnn.com",
    "reuters.com",
    "ap.org",
    "apnews.com",
    "vnexpress.net",
    "tuoitre.vn",
    "thanhnien.vn",
    "vietnamnet.vn",
    "dantri.com.vn",
    "vietnamnews.vn",
    "bloomberg.com",
    "wsj.com",
    "nytimes.com",
    "theguardian.com",
    "factcheck.org",
    "snopes.com",
    "politifact.com",
];

/// Social and video platforms: user-generated, rarely citable
pub const DEFAULT_DENYLIST: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "youtube.com",
    "reddit.com",
];

/// Allow and deny lists driving [`TrustRanker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPolicy {
    allowlist: Vec<String>,
    denylist: Vec<String>,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWLIST.iter().copied(), DEFAULT_DENYLIST.iter().copied())
    }
}

fn normalize_entries<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|entry| extract_domain(entry.as_ref()))
        .collect()
}

impl TrustPolicy {
    /// Build a policy from arbitrary lists
    ///
    /// Entries are normalised like hosts: lower-cased, leading `www.` removed.
    #[must_use]
    pub fn new<A, D, S, T>(allowlist: A, denylist: D) -> Self
    where
        A: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            allowlist: normalize_entries(allowlist),
            denylist: normalize_entries(denylist),
        }
    }

    #[must_use]
    pub fn allowlist(&self) -> &[String] {
        &self.allowlist
    }

    #[must_use]
    pub fn denylist(&self) -> &[String] {
        &self.denylist
    }

    #[must_use]
    pub fn is_allowed_host(&self, host: &str) -> bool {
        self.allowlist.iter().any(|d| host_matches(host, d))
    }

    #[must_use]
    pub fn is_denied_host(&self, host: &str) -> bool {
        self.denylist.iter().any(|d| host_matches(host, d))
    }
}

/// Host a result is judged by: the display domain, else the link host
fn result_host(result: &SearchResult) -> String {
    extract_domain(&result.display_domain)
        .or_else(|| extract_domain(&result.link))
        .unwrap_or_default()
}

/// Pure, deterministic ranking of search results
#[derive(Debug, Clone, Default)]
pub struct TrustRanker {
    policy: TrustPolicy,
}

impl TrustRanker {
    #[must_use]
    pub fn new(policy: TrustPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &TrustPolicy {
        &self.policy
    }

    #[must_use]
    pub fn is_trusted(&self, result: &SearchResult) -> bool {
        self.policy.is_allowed_host(&result_host(result))
    }

    #[must_use]
    pub fn is_denied(&self, result: &SearchResult) -> bool {
        self.policy.is_denied_host(&result_host(result))
    }

    /// Dedupe by link, drop denylisted domains, move allowlisted ones first
    ///
    /// The output is a subset of the input with unique links; within the
    /// trusted and untrusted groups input order is preserved.
    #[must_use]
    pub fn rank(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        let input_len = results.len();
        let mut seen: HashSet<String> = HashSet::with_capacity(input_len);
        let mut trusted = Vec::new();
        let mut others = Vec::new();

        for result in results {
            if !seen.insert(result.link.clone()) {
                continue;
            }
            let host = result_host(&result);
            if self.policy.is_denied_host(&host) {
                continue;
            }
            if self.policy.is_allowed_host(&host) {
                trusted.push(result);
            } else {
                others.push(result);
            }
        }

        debug!(
            "trust ranking: {input_len} in, {} trusted, {} other",
            trusted.len(),
            others.len()
        );
        trusted.extend(others);
        trusted
    }
}
