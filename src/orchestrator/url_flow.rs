//! Two-phase URL flow
//!
//! `run_url` records the stage of every state it enters, then applies that
//! state's transition until a terminal state produces the verdict.

use std::collections::HashSet;

use tracing::{info, warn};

use super::fallback::{
    self, LIMIT_NOTHING_FETCHED, LIMIT_QUOTA_EXHAUSTED, LIMIT_SEARCH_NOT_CONFIGURED,
};
use super::queries::{first_phase_queries, second_phase_queries};
use super::state::{AiOnlyCause, Stage, UrlState};
use super::EvidenceOrchestrator;
use crate::content_fetcher::PageFetcher;
use crate::evidence::{EvidenceBundle, Phase, PhaseUsed, SearchResult, Verdict};
use crate::judgment::JudgmentClient;
use crate::judgment::prompts::{synthesis_prompt, topic_extraction_prompt, url_only_prompt};
use crate::web_search::SearchProvider;

/// Per-run context shared by every transition
struct UrlRun<'a> {
    url: &'a str,
    keywords: String,
    bundle: EvidenceBundle,
    stages: Vec<Stage>,
}

impl AiOnlyCause {
    fn limit_reason(self) -> &'static str {
        match self {
            AiOnlyCause::SearchNotConfigured => LIMIT_SEARCH_NOT_CONFIGURED,
            AiOnlyCause::QuotaExhausted => LIMIT_QUOTA_EXHAUSTED,
            AiOnlyCause::NothingFetched => LIMIT_NOTHING_FETCHED,
        }
    }
}

impl<S, F, J> EvidenceOrchestrator<S, F, J>
where
    S: SearchProvider,
    F: PageFetcher,
    J: JudgmentClient,
{
    pub(super) async fn run_url(&self, url: &str) -> (Verdict, EvidenceBundle, Vec<Stage>) {
        let mut run = UrlRun {
            url,
            keywords: String::new(),
            bundle: EvidenceBundle::new(url),
            stages: Vec::new(),
        };

        let mut state = UrlState::Init;
        loop {
            run.stages.push(state.stage());
            state = match state {
                UrlState::Synthesized(verdict) => {
                    return (*verdict, run.bundle, run.stages);
                }
                UrlState::AiOnlyFallback(cause) => {
                    let verdict = self.ai_only_verdict(&run, cause).await;
                    return (verdict, run.bundle, run.stages);
                }
                UrlState::SimplifiedFallback => {
                    let verdict = simplified_verdict(&run);
                    return (verdict, run.bundle, run.stages);
                }
                other => self.step(other, &mut run).await,
            };
        }
    }

    /// One non-terminal transition
    async fn step(&self, state: UrlState, run: &mut UrlRun<'_>) -> UrlState {
        match state {
            UrlState::Init => {
                run.keywords = self.keywords.extract(run.url);
                info!(url = %run.url, keywords = %run.keywords, "Derived keywords from URL");
                UrlState::KeywordDerived
            }

            UrlState::KeywordDerived => {
                let Some(search) = self.search.as_ref() else {
                    warn!(url = %run.url, "Search is not configured, judging URL alone");
                    return UrlState::AiOnlyFallback(AiOnlyCause::SearchNotConfigured);
                };
                let queries = first_phase_queries(&run.keywords, self.settings.first_max_queries);
                let round = self
                    .search_round(
                        search,
                        Phase::First,
                        &queries,
                        self.settings.first_results_per_query,
                        &mut run.bundle,
                    )
                    .await;
                if round.quota_exhausted {
                    return UrlState::AiOnlyFallback(AiOnlyCause::QuotaExhausted);
                }
                let seen_links: HashSet<String> = round.results.iter().map(|r| r.link.clone()).collect();
                let ranked = self.ranker.rank(round.results);
                info!(queries = queries.len(), ranked = ranked.len(), "Phase 1 search done");
                UrlState::FirstSearchDone { ranked, seen_links }
            }

            UrlState::FirstSearchDone { ranked, seen_links } => {
                let succeeded = self
                    .fetch_round(Phase::First, &ranked, self.settings.first_fetch_top, &mut run.bundle)
                    .await;
                if succeeded == 0 {
                    warn!(url = %run.url, candidates = ranked.len(), "No phase 1 source could be fetched");
                    return UrlState::AiOnlyFallback(AiOnlyCause::NothingFetched);
                }
                UrlState::FirstFetchDone { seen_links }
            }

            UrlState::FirstFetchDone { seen_links } => {
                let first = run.bundle.contents_for(Phase::First);
                let prompt = topic_extraction_prompt(run.url, &run.keywords, &first);
                match self.judge.extract_topics(&prompt).await {
                    Ok(topic) => {
                        info!(title = %topic.main_title(), topics = topic.key_topics().len(), "Topic extracted");
                        run.bundle.set_topic(topic.clone());
                        UrlState::TopicExtracted { topic, seen_links }
                    }
                    Err(e) => {
                        warn!(error = %e, "Topic extraction failed");
                        UrlState::SimplifiedFallback
                    }
                }
            }

            UrlState::TopicExtracted { topic, seen_links } => {
                let ranked = match self.search.as_ref() {
                    Some(search) => {
                        let queries = second_phase_queries(&topic, self.settings.second_max_queries);
                        let round = self
                            .search_round(
                                search,
                                Phase::Second,
                                &queries,
                                self.settings.second_results_per_query,
                                &mut run.bundle,
                            )
                            .await;
                        if round.quota_exhausted {
                            warn!("Search quota exhausted in phase 2, continuing with gathered evidence");
                        }
                        let fresh: Vec<SearchResult> = round
                            .results
                            .into_iter()
                            .filter(|r| !seen_links.contains(&r.link))
                            .collect();
                        self.ranker.rank(fresh)
                    }
                    None => Vec::new(),
                };
                info!(ranked = ranked.len(), "Phase 2 search done");
                UrlState::SecondSearchDone { topic, ranked }
            }

            UrlState::SecondSearchDone { topic, ranked } => {
                if !ranked.is_empty() {
                    self.fetch_round(Phase::Second, &ranked, self.settings.second_fetch_top, &mut run.bundle)
                        .await;
                }
                UrlState::SecondFetchDone { topic }
            }

            UrlState::SecondFetchDone { topic } => {
                let first = run.bundle.contents_for(Phase::First);
                let second = run.bundle.contents_for(Phase::Second);
                let queries = run.bundle.query_strings();
                let prompt = synthesis_prompt(run.url, &run.keywords, &topic, &first, &second, &queries);
                let sources = first.len() + second.len();
                match self.judge.synthesize(&prompt).await {
                    Ok(model) => {
                        let verdict = Verdict::from(model)
                            .with_sources(sources, PhaseUsed::TwoPhase)
                            .with_queries(queries)
                            .with_topic(topic.main_title(), topic.key_topics().to_vec())
                            .with_original_url(run.url);
                        UrlState::Synthesized(Box::new(verdict))
                    }
                    Err(e) => {
                        warn!(error = %e, sources, "Final synthesis failed");
                        UrlState::SimplifiedFallback
                    }
                }
            }

            terminal @ (UrlState::Synthesized(_)
            | UrlState::AiOnlyFallback(_)
            | UrlState::SimplifiedFallback) => terminal,
        }
    }

    /// Judge the URL from its address and keywords alone
    async fn ai_only_verdict(&self, run: &UrlRun<'_>, cause: AiOnlyCause) -> Verdict {
        let limit_reason = cause.limit_reason();
        let prompt = url_only_prompt(run.url, &run.keywords);
        let verdict = match self.judge.judge_claim(&prompt).await {
            Ok(model) => Verdict::from(model)
                .with_sources(0, PhaseUsed::None)
                .limited(limit_reason)
                .with_original_url(run.url),
            Err(e) => {
                warn!(error = %e, "Address-only judgment failed");
                fallback::ai_only_failure(run.url, &e.to_string(), limit_reason)
            }
        };
        verdict.with_queries(run.bundle.query_strings())
    }
}

/// Deterministic verdict over every source gathered so far
fn simplified_verdict(run: &UrlRun<'_>) -> Verdict {
    let phase_used = if run.bundle.has_phase_queries(Phase::Second) {
        PhaseUsed::TwoPhase
    } else {
        PhaseUsed::SingleSearch
    };
    let verdict = fallback::simplified(run.url, run.bundle.successful_count(), phase_used)
        .with_queries(run.bundle.query_strings());
    match run.bundle.topic() {
        Some(topic) => verdict.with_topic(topic.main_title(), topic.key_topics().to_vec()),
        None => verdict,
    }
}
