//! Evidence pipeline orchestration
//!
//! [`EvidenceOrchestrator`] drives one analysis from raw input to
//! [`AnalysisReport`]:
//! - URL input: keywords → search → fetch → topic extraction → re-search →
//!   fetch → synthesis, as an explicit state machine ([`Stage`])
//! - Text input: search on the claim → fetch → single judgment
//!
//! Phases run strictly in sequence. Queries inside a round are issued one at
//! a time with a pause between them; fetches inside a round run concurrently
//! up to a bound. Every failure below this layer turns into a fallback branch
//! or a degraded verdict, never an error.

mod fallback;
mod pacing;
mod queries;
mod report;
mod state;
mod text_flow;
mod url_flow;

pub use fallback::{
    AI_ONLY_FAILURE_CONFIDENCE, LIMIT_MODEL_UNAVAILABLE, LIMIT_NOTHING_FETCHED,
    LIMIT_QUOTA_EXHAUSTED, LIMIT_SEARCH_NOT_CONFIGURED, LIMIT_TWO_PHASE_INCOMPLETE,
    NEUTRAL_CONFIDENCE,
};
pub use pacing::{FixedDelay, NoPacing, QueryPacing};
pub use queries::{first_phase_queries, second_phase_queries, text_queries};
pub use report::{AnalysisReport, InputKind, PipelineError};
pub use state::Stage;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{FactCheckConfig, PipelineSettings};
use crate::content_fetcher::{PageFetcher, fetch_all};
use crate::evidence::{EvidenceBundle, Phase, SearchResult};
use crate::judgment::JudgmentClient;
use crate::keywords::KeywordExtractor;
use crate::trust::TrustRanker;
use crate::utils::DEFAULT_FETCH_CONCURRENCY;
use crate::web_search::SearchProvider;

/// Outcome of one round of sequential queries
#[derive(Debug, Default)]
pub(crate) struct SearchRound {
    /// Raw hits of every successful query, in issue order
    pub(crate) results: Vec<SearchResult>,
    pub(crate) quota_exhausted: bool,
}

/// Runs the evidence pipeline over injected collaborators
///
/// `search` is optional: without a provider the URL flow goes straight to
/// the address-only fallback and the text flow to a claim-only judgment.
#[derive(Debug)]
pub struct EvidenceOrchestrator<S, F, J> {
    search: Option<S>,
    fetcher: F,
    judge: J,
    ranker: TrustRanker,
    keywords: KeywordExtractor,
    pacing: Arc<dyn QueryPacing>,
    settings: PipelineSettings,
    fetch_concurrency: usize,
}

impl<S, F, J> EvidenceOrchestrator<S, F, J>
where
    S: SearchProvider,
    F: PageFetcher,
    J: JudgmentClient,
{
    /// Orchestrator with default ranking, pacing and settings
    pub fn new(search: Option<S>, fetcher: F, judge: J) -> Self {
        Self {
            search,
            fetcher,
            judge,
            ranker: TrustRanker::default(),
            keywords: KeywordExtractor::new(),
            pacing: Arc::new(FixedDelay::default()),
            settings: PipelineSettings::default(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Orchestrator tuned by `config` (settings, pacing, fetch concurrency)
    pub fn from_config(config: &FactCheckConfig, search: Option<S>, fetcher: F, judge: J) -> Self {
        Self::new(search, fetcher, judge)
            .with_settings(config.settings().clone())
            .with_pacing(FixedDelay(config.query_delay()))
            .with_fetch_concurrency(config.fetch_concurrency())
    }

    #[must_use]
    pub fn with_ranker(mut self, ranker: TrustRanker) -> Self {
        self.ranker = ranker;
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: impl QueryPacing + 'static) -> Self {
        self.pacing = Arc::new(pacing);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn search_enabled(&self) -> bool {
        self.search.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Analyze a claim or a URL
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] for blank input. Every other
    /// problem is reflected in the verdict (`limited_analysis`,
    /// `limit_reason`) rather than returned.
    pub async fn analyze(&self, input: &str) -> Result<AnalysisReport, PipelineError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let kind = InputKind::classify(input);
        info!(kind = ?kind, search = self.search_enabled(), "Starting analysis");

        let (verdict, bundle, stages) = match kind {
            InputKind::Url => self.run_url(input).await,
            InputKind::Text => self.run_text(input).await,
        };

        info!(
            kind = ?kind,
            is_fake = verdict.is_fake,
            confidence = verdict.confidence,
            sources = verdict.sources_analyzed,
            limited = verdict.limited_analysis,
            final_stage = ?stages.last(),
            "Analysis completed"
        );
        Ok(AnalysisReport::new(kind, verdict, &bundle, stages))
    }

    /// Issue `queries` one at a time, pacing between them
    ///
    /// A quota error stops the round; any other error skips that query.
    pub(crate) async fn search_round(
        &self,
        search: &S,
        phase: Phase,
        queries: &[String],
        results_per_query: usize,
        bundle: &mut EvidenceBundle,
    ) -> SearchRound {
        let mut round = SearchRound::default();
        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                let delay = self.pacing.delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            match search.search(query, results_per_query).await {
                Ok(results) => {
                    info!(phase = ?phase, query = %query, hits = results.len(), "Search query completed");
                    bundle.record_query(phase, query.as_str(), results.len());
                    round.results.extend(results);
                }
                Err(e) if e.is_quota_exceeded() => {
                    warn!(phase = ?phase, query = %query, error = %e, "Search quota exhausted, stopping round");
                    bundle.record_failed_query(phase, query.as_str(), e.to_string());
                    round.quota_exhausted = true;
                    break;
                }
                Err(e) => {
                    warn!(phase = ?phase, query = %query, error = %e, "Search query failed");
                    bundle.record_failed_query(phase, query.as_str(), e.to_string());
                }
            }
        }
        round
    }

    /// Fetch the first `top` ranked results; returns the number of successes
    pub(crate) async fn fetch_round(
        &self,
        phase: Phase,
        ranked: &[SearchResult],
        top: usize,
        bundle: &mut EvidenceBundle,
    ) -> usize {
        let urls: Vec<String> = ranked.iter().take(top).map(|r| r.link.clone()).collect();
        if urls.is_empty() {
            return 0;
        }
        let fetched = fetch_all(&self.fetcher, &urls, self.fetch_concurrency).await;
        let succeeded = bundle.add_fetched(phase, fetched);
        info!(phase = ?phase, requested = urls.len(), succeeded, "Fetch round completed");
        succeeded
    }
}
