//! Single-phase flow for plain-text claims

use tracing::{debug, info, warn};

use super::EvidenceOrchestrator;
use super::fallback::{self, LIMIT_QUOTA_EXHAUSTED, LIMIT_SEARCH_NOT_CONFIGURED};
use super::queries::text_queries;
use super::state::Stage;
use crate::content_fetcher::PageFetcher;
use crate::evidence::{EvidenceBundle, FetchedContent, Phase, PhaseUsed, Verdict};
use crate::judgment::prompts::{claim_only_prompt, claim_with_evidence_prompt, evidence_analysis_prompt};
use crate::judgment::{EvidenceAnalysis, JudgmentClient, JudgmentError};
use crate::web_search::SearchProvider;

impl<S, F, J> EvidenceOrchestrator<S, F, J>
where
    S: SearchProvider,
    F: PageFetcher,
    J: JudgmentClient,
{
    pub(super) async fn run_text(&self, claim: &str) -> (Verdict, EvidenceBundle, Vec<Stage>) {
        let mut bundle = EvidenceBundle::new(claim);
        let mut stages = vec![Stage::Init];
        let mut limit_reason = None;

        match self.search.as_ref() {
            Some(search) => {
                let settings = &self.settings;
                let queries = text_queries(
                    claim,
                    settings.text_query_chars,
                    settings.text_short_query_chars,
                    settings.text_max_queries,
                );
                let round = self
                    .search_round(search, Phase::Text, &queries, settings.text_results_per_query, &mut bundle)
                    .await;
                if round.quota_exhausted {
                    limit_reason = Some(LIMIT_QUOTA_EXHAUSTED);
                }
                let ranked = self.ranker.rank(round.results);
                stages.push(Stage::TextSearchDone);

                self.fetch_round(Phase::Text, &ranked, settings.text_fetch_top, &mut bundle)
                    .await;
                stages.push(Stage::TextFetchDone);
            }
            None => {
                debug!("Search is not configured, judging claim alone");
                limit_reason = Some(LIMIT_SEARCH_NOT_CONFIGURED);
            }
        }

        let sources = bundle.successful_count();
        let verdict = if sources > 0 {
            let contents = bundle.all_contents();
            let analysis = self.deep_analysis(claim, &contents).await;
            if analysis.is_some() {
                stages.push(Stage::EvidenceAnalyzed);
            }
            let prompt = claim_with_evidence_prompt(claim, &contents, analysis.as_ref());
            stages.push(Stage::ContentJudged);
            match self.judge.judge_claim(&prompt).await {
                Ok(model) => Verdict::from(model).with_sources(sources, PhaseUsed::SingleSearch),
                Err(e) => {
                    warn!(error = %e, sources, "Claim judgment with evidence failed");
                    fallback::text_judgment_failure(sources)
                }
            }
        } else {
            stages.push(Stage::ClaimOnlyJudged);
            match self.judge.judge_claim(&claim_only_prompt(claim)).await {
                Ok(model) => {
                    let verdict = Verdict::from(model).with_sources(0, PhaseUsed::None);
                    match limit_reason {
                        Some(reason) => verdict.limited(reason),
                        None => verdict,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Claim-only judgment failed");
                    fallback::text_judgment_failure(0)
                }
            }
        };

        info!(sources, queries = bundle.queries().len(), "Text analysis done");
        (verdict.with_queries(bundle.query_strings()), bundle, stages)
    }

    /// Optional deep reading of the longer sources; `None` on any failure
    async fn deep_analysis(&self, claim: &str, contents: &[&FetchedContent]) -> Option<EvidenceAnalysis> {
        if !self.settings.deep_analysis_enabled {
            return None;
        }
        let eligible: Vec<&FetchedContent> = contents
            .iter()
            .copied()
            .filter(|c| c.char_length() > self.settings.deep_analysis_min_chars)
            .collect();
        if eligible.is_empty() {
            return None;
        }

        match self.judge.analyze_evidence(&evidence_analysis_prompt(claim, &eligible)).await {
            Ok(analysis) => {
                info!(sources = eligible.len(), "Deep evidence analysis done");
                Some(analysis)
            }
            Err(JudgmentError::Unsupported(what)) => {
                debug!(what, "Deep evidence analysis not supported");
                None
            }
            Err(e) => {
                warn!(error = %e, "Deep evidence analysis failed");
                None
            }
        }
    }
}
