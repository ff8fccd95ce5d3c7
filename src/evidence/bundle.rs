//! Evidence accumulated over one analysis run

use serde::Serialize;

use super::fetched::FetchedContent;
use super::topic::TopicProfile;
use crate::utils::{PREVIEW_CHARS, extract_domain, preview};

/// Which round of searching produced a query or a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// URL flow, keyword-driven round
    First,
    /// URL flow, topic-driven round
    Second,
    /// Plain-text flow
    Text,
}

/// One issued search query and what came of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseQuery {
    pub phase: Phase,
    pub query: String,
    /// Raw hits returned before ranking
    pub hits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A successfully fetched source and the phase it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasedContent {
    pub phase: Phase,
    pub content: FetchedContent,
}

/// Everything gathered while analysing one input
///
/// Only successful fetches are kept as contents; failures are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceBundle {
    original_input: String,
    queries: Vec<PhaseQuery>,
    contents: Vec<PhasedContent>,
    topic: Option<TopicProfile>,
    search_hits: usize,
    fetch_attempted: usize,
    fetch_failed: usize,
}

impl EvidenceBundle {
    #[must_use]
    pub fn new(original_input: impl Into<String>) -> Self {
        Self {
            original_input: original_input.into(),
            ..Self::default()
        }
    }

    pub fn record_query(&mut self, phase: Phase, query: impl Into<String>, hits: usize) {
        self.search_hits += hits;
        self.queries.push(PhaseQuery {
            phase,
            query: query.into(),
            hits,
            error: None,
        });
    }

    pub fn record_failed_query(&mut self, phase: Phase, query: impl Into<String>, error: impl Into<String>) {
        self.queries.push(PhaseQuery {
            phase,
            query: query.into(),
            hits: 0,
            error: Some(error.into()),
        });
    }

    /// Add a batch of fetch outcomes; returns how many succeeded
    pub fn add_fetched(&mut self, phase: Phase, batch: Vec<FetchedContent>) -> usize {
        let mut succeeded = 0;
        for content in batch {
            self.fetch_attempted += 1;
            if content.success() {
                succeeded += 1;
                self.contents.push(PhasedContent { phase, content });
            } else {
                self.fetch_failed += 1;
            }
        }
        succeeded
    }

    pub fn set_topic(&mut self, topic: TopicProfile) {
        self.topic = Some(topic);
    }

    #[must_use]
    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    #[must_use]
    pub fn queries(&self) -> &[PhaseQuery] {
        &self.queries
    }

    /// Query strings in issue order, failed queries included
    #[must_use]
    pub fn query_strings(&self) -> Vec<String> {
        self.queries.iter().map(|q| q.query.clone()).collect()
    }

    #[must_use]
    pub fn contents(&self) -> &[PhasedContent] {
        &self.contents
    }

    /// Successful contents of one phase, in fetch order
    #[must_use]
    pub fn contents_for(&self, phase: Phase) -> Vec<&FetchedContent> {
        self.contents
            .iter()
            .filter(|c| c.phase == phase)
            .map(|c| &c.content)
            .collect()
    }

    /// Every successful content, in fetch order
    #[must_use]
    pub fn all_contents(&self) -> Vec<&FetchedContent> {
        self.contents.iter().map(|c| &c.content).collect()
    }

    #[must_use]
    pub fn successful_count(&self) -> usize {
        self.contents.len()
    }

    #[must_use]
    pub fn topic(&self) -> Option<&TopicProfile> {
        self.topic.as_ref()
    }

    #[must_use]
    pub fn has_phase_queries(&self, phase: Phase) -> bool {
        self.queries.iter().any(|q| q.phase == phase)
    }

    /// Aggregate counters for reporting
    #[must_use]
    pub fn statistics(&self) -> EvidenceStatistics {
        let mut source_domains: Vec<String> = Vec::new();
        for domain in self
            .contents
            .iter()
            .filter_map(|c| extract_domain(c.content.source_url()))
        {
            if !source_domains.contains(&domain) {
                source_domains.push(domain);
            }
        }
        EvidenceStatistics {
            queries_issued: self.queries.len(),
            search_hits: self.search_hits,
            sources_attempted: self.fetch_attempted,
            sources_succeeded: self.contents.len(),
            sources_failed: self.fetch_failed,
            total_content_length: self.contents.iter().map(|c| c.content.char_length()).sum(),
            source_domains,
        }
    }

    /// Report-friendly projection: queries plus short source previews
    #[must_use]
    pub fn summary(&self) -> EvidenceSummary {
        EvidenceSummary {
            queries: self.queries.clone(),
            sources: self
                .contents
                .iter()
                .map(|c| SourceSummary {
                    phase: c.phase,
                    url: c.content.source_url().to_string(),
                    title: c.content.title().to_string(),
                    preview: preview(c.content.body_text(), PREVIEW_CHARS),
                    length: c.content.char_length(),
                    note: c.content.extraction_note().map(str::to_string),
                })
                .collect(),
            topic: self.topic.clone(),
        }
    }
}

/// Counters describing how much evidence a run gathered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceStatistics {
    pub queries_issued: usize,
    pub search_hits: usize,
    pub sources_attempted: usize,
    pub sources_succeeded: usize,
    pub sources_failed: usize,
    /// Body characters across successful sources
    pub total_content_length: usize,
    /// Distinct hosts of successful sources, first seen first
    pub source_domains: Vec<String>,
}

/// One source as shown in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub phase: Phase,
    pub url: String,
    pub title: String,
    /// First characters of the body text
    pub preview: String,
    /// Body length in characters
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceSummary {
    pub queries: Vec<PhaseQuery>,
    pub sources: Vec<SourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<TopicProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::FetchFailureKind;

    #[test]
    fn only_successes_are_kept() {
        let mut bundle = EvidenceBundle::new("claim");
        let added = bundle.add_fetched(
            Phase::First,
            vec![
                FetchedContent::extracted("https://a.vn/1", "A", "nội dung"),
                FetchedContent::failed("https://b.vn/2", FetchFailureKind::Network, "timeout"),
            ],
        );
        assert_eq!(added, 1);
        assert_eq!(bundle.successful_count(), 1);
        let stats = bundle.statistics();
        assert_eq!(stats.sources_attempted, 2);
        assert_eq!(stats.sources_failed, 1);
    }

    #[test]
    fn contents_are_filtered_by_phase() {
        let mut bundle = EvidenceBundle::new("https://a.vn/x");
        bundle.add_fetched(Phase::First, vec![FetchedContent::extracted("u1", "", "one")]);
        bundle.add_fetched(Phase::Second, vec![FetchedContent::extracted("u2", "", "two")]);
        assert_eq!(bundle.contents_for(Phase::Second).len(), 1);
        assert_eq!(bundle.all_contents().len(), 2);
    }

    #[test]
    fn statistics_sum_lengths_and_dedupe_domains() {
        let mut bundle = EvidenceBundle::new("claim");
        bundle.add_fetched(
            Phase::Text,
            vec![
                FetchedContent::extracted("https://www.vnexpress.net/a", "A", "bốn chữ"),
                FetchedContent::extracted("https://tuoitre.vn/b", "B", "ba"),
                FetchedContent::extracted("https://vnexpress.net/c", "C", "một"),
                FetchedContent::failed("https://dantri.com.vn/d", FetchFailureKind::Network, "timeout"),
            ],
        );
        let stats = bundle.statistics();
        assert_eq!(stats.total_content_length, 7 + 2 + 3);
        assert_eq!(stats.source_domains, ["vnexpress.net", "tuoitre.vn"]);
    }
}
