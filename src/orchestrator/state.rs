//! Pipeline stages and the URL-flow state machine

use std::collections::HashSet;

use serde::Serialize;

use crate::evidence::{SearchResult, TopicProfile, Verdict};

/// A stage an analysis run passed through, recorded in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Init,
    KeywordDerived,
    FirstSearchDone,
    FirstFetchDone,
    TopicExtracted,
    SecondSearchDone,
    SecondFetchDone,
    Synthesized,
    /// URL judged from its address and keywords only
    AiOnlyFallback,
    /// Deterministic verdict over whatever phase-1/phase-2 content exists
    SimplifiedFallback,
    TextSearchDone,
    TextFetchDone,
    EvidenceAnalyzed,
    /// Text claim judged with web evidence
    ContentJudged,
    /// Text claim judged without web evidence
    ClaimOnlyJudged,
}

impl Stage {
    /// Stages that end a run
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Stage::Synthesized
                | Stage::AiOnlyFallback
                | Stage::SimplifiedFallback
                | Stage::ContentJudged
                | Stage::ClaimOnlyJudged
        )
    }
}

/// Why a URL run fell back to the address-only judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AiOnlyCause {
    SearchNotConfigured,
    QuotaExhausted,
    NothingFetched,
}

/// URL-flow state; each variant carries exactly what its transition needs
#[derive(Debug)]
pub(crate) enum UrlState {
    Init,
    KeywordDerived,
    FirstSearchDone {
        ranked: Vec<SearchResult>,
        seen_links: HashSet<String>,
    },
    FirstFetchDone {
        seen_links: HashSet<String>,
    },
    TopicExtracted {
        topic: TopicProfile,
        seen_links: HashSet<String>,
    },
    SecondSearchDone {
        topic: TopicProfile,
        ranked: Vec<SearchResult>,
    },
    SecondFetchDone {
        topic: TopicProfile,
    },
    Synthesized(Box<Verdict>),
    AiOnlyFallback(AiOnlyCause),
    SimplifiedFallback,
}

impl UrlState {
    pub(crate) fn stage(&self) -> Stage {
        match self {
            UrlState::Init => Stage::Init,
            UrlState::KeywordDerived => Stage::KeywordDerived,
            UrlState::FirstSearchDone { .. } => Stage::FirstSearchDone,
            UrlState::FirstFetchDone { .. } => Stage::FirstFetchDone,
            UrlState::TopicExtracted { .. } => Stage::TopicExtracted,
            UrlState::SecondSearchDone { .. } => Stage::SecondSearchDone,
            UrlState::SecondFetchDone { .. } => Stage::SecondFetchDone,
            UrlState::Synthesized(_) => Stage::Synthesized,
            UrlState::AiOnlyFallback(_) => Stage::AiOnlyFallback,
            UrlState::SimplifiedFallback => Stage::SimplifiedFallback,
        }
    }
}
