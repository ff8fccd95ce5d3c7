//! Final verdict of an analysis

use serde::Serialize;
use serde_json::{Map, Value};

/// How much of the search pipeline backed a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseUsed {
    /// No web evidence at all
    None,
    /// One round of search and fetch
    SingleSearch,
    /// Topic-driven second round completed as well
    TwoPhase,
}

/// Verdict on a claim
///
/// `is_fake`, `confidence`, `reason`, `indicators` and `recommendation`
/// come from the judgment model unchanged; every other field is computed by
/// the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_fake: bool,
    /// 0 to 100
    pub confidence: u8,
    pub reason: String,
    pub indicators: Vec<String>,
    pub recommendation: String,

    pub sources_analyzed: usize,
    pub web_evidence_used: bool,
    pub phase_used: PhaseUsed,
    pub limited_analysis: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_reason: Option<String>,

    pub search_queries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identified_title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,

    /// Additional analysis fields returned by the model, passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Verdict {
    /// Verdict with the model-facing fields set and no provenance yet
    #[must_use]
    pub fn new(
        is_fake: bool,
        confidence: u8,
        reason: impl Into<String>,
        indicators: Vec<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            is_fake,
            confidence: confidence.min(100),
            reason: reason.into(),
            indicators,
            recommendation: recommendation.into(),
            sources_analyzed: 0,
            web_evidence_used: false,
            phase_used: PhaseUsed::None,
            limited_analysis: false,
            limit_reason: None,
            search_queries: Vec::new(),
            identified_title: None,
            key_topics: Vec::new(),
            original_url: None,
            extra: Map::new(),
        }
    }

    /// Record how many sources backed the verdict
    ///
    /// `web_evidence_used` always follows `sources_analyzed > 0`.
    #[must_use]
    pub fn with_sources(mut self, sources_analyzed: usize, phase_used: PhaseUsed) -> Self {
        self.sources_analyzed = sources_analyzed;
        self.web_evidence_used = sources_analyzed > 0;
        self.phase_used = phase_used;
        self
    }

    #[must_use]
    pub fn limited(mut self, reason: impl Into<String>) -> Self {
        self.limited_analysis = true;
        self.limit_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_queries(mut self, queries: Vec<String>) -> Self {
        self.search_queries = queries;
        self
    }

    #[must_use]
    pub fn with_original_url(mut self, url: impl Into<String>) -> Self {
        self.original_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_topic(mut self, title: impl Into<String>, topics: Vec<String>) -> Self {
        self.identified_title = Some(title.into());
        self.key_topics = topics;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }
}
