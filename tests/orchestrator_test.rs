//! End-to-end pipeline tests over fake search, fetch and judgment backends

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use kodegen_tools_factcheck::config::{FactCheckConfig, PipelineSettings};
use kodegen_tools_factcheck::evidence::PhaseUsed;
use kodegen_tools_factcheck::judgment::{EvidenceAnalysis, JudgmentError};
use kodegen_tools_factcheck::orchestrator::{
    AI_ONLY_FAILURE_CONFIDENCE, EvidenceOrchestrator, InputKind, LIMIT_MODEL_UNAVAILABLE,
    LIMIT_NOTHING_FETCHED, LIMIT_QUOTA_EXHAUSTED, LIMIT_SEARCH_NOT_CONFIGURED,
    LIMIT_TWO_PHASE_INCOMPLETE, NEUTRAL_CONFIDENCE, FixedDelay, NoPacing, PipelineError, Stage,
};
use kodegen_tools_factcheck::web_search::SearchError;
use tokio::time::Instant;

mod common;

use common::{FakeFetcher, FakeJudge, FakeSearch, JudgeCall, result, sample_topic};

const ARTICLE_URL: &str = "https://example.com/vi/bai-viet-ve-thien-tai-mien-trung-2024";
const CLAIM: &str = "Bão Yagi đổ bộ vào Quảng Ninh với sức gió cấp 12 và gây thiệt hại lớn";

const FIRST_A: &str = "https://vnexpress.net/bao-yagi-1";
const FIRST_B: &str = "https://tuoitre.vn/bao-yagi-2";
const SECOND_C: &str = "https://thanhnien.vn/bao-yagi-3";

/// Phase-1 queries are built from the URL slug; everything else is phase 2
fn is_first_phase(query: &str) -> bool {
    query.contains("thien tai")
}

/// Phase 1 finds A and B, phase 2 finds A again plus C
fn two_phase_search() -> FakeSearch {
    FakeSearch::new(|query| {
        if is_first_phase(query) {
            Ok(vec![result(FIRST_A), result("https://www.facebook.com/share/1"), result(FIRST_B)])
        } else {
            Ok(vec![result(FIRST_A), result(SECOND_C)])
        }
    })
}

fn pipeline(
    search: Option<FakeSearch>,
    fetcher: FakeFetcher,
    judge: FakeJudge,
) -> EvidenceOrchestrator<FakeSearch, FakeFetcher, FakeJudge> {
    EvidenceOrchestrator::new(search, fetcher, judge).with_pacing(NoPacing)
}

fn all_sources() -> FakeFetcher {
    FakeFetcher::serving_all([FIRST_A, FIRST_B, SECOND_C])
}

// =============================================================================
// URL flow
// =============================================================================

#[tokio::test]
async fn test_url_two_phase_synthesis() {
    let judge = Arc::new(FakeJudge::new());
    let orchestrator = EvidenceOrchestrator::new(Some(two_phase_search()), all_sources(), Arc::clone(&judge))
        .with_pacing(NoPacing);

    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(report.input_kind, InputKind::Url);
    assert_eq!(
        report.stages,
        [
            Stage::Init,
            Stage::KeywordDerived,
            Stage::FirstSearchDone,
            Stage::FirstFetchDone,
            Stage::TopicExtracted,
            Stage::SecondSearchDone,
            Stage::SecondFetchDone,
            Stage::Synthesized,
        ]
    );
    let verdict = &report.verdict;
    assert!(!verdict.is_fake);
    assert_eq!(verdict.confidence, 85);
    assert_eq!(verdict.phase_used, PhaseUsed::TwoPhase);
    assert_eq!(verdict.sources_analyzed, 3);
    assert!(verdict.web_evidence_used);
    assert!(!verdict.limited_analysis);
    assert_eq!(verdict.original_url.as_deref(), Some(ARTICLE_URL));
    assert_eq!(verdict.identified_title.as_deref(), Some(sample_topic().main_title()));
    assert_eq!(verdict.key_topics, sample_topic().key_topics());
    assert_eq!(verdict.search_queries.len(), 3 + 5);
    assert_eq!(verdict.search_queries[0], "bai viet ve thien tai mien trung 2024");

    assert_eq!(judge.calls(), [JudgeCall::Topics, JudgeCall::Synthesize]);
    assert_eq!(report.statistics.sources_succeeded, 3);
    assert!(report.evidence.topic.is_some());
}

#[tokio::test]
async fn test_phase_two_does_not_refetch_phase_one_links() {
    let fetcher = Arc::new(all_sources());
    let orchestrator = EvidenceOrchestrator::new(Some(two_phase_search()), Arc::clone(&fetcher), FakeJudge::new())
        .with_pacing(NoPacing);

    orchestrator.analyze(ARTICLE_URL).await.expect("report");

    let calls = fetcher.calls();
    assert_eq!(calls.iter().filter(|u| *u == FIRST_A).count(), 1, "{calls:?}");
    assert!(calls.iter().any(|u| u == SECOND_C));
    assert!(!calls.iter().any(|u| u.contains("facebook.com")));
}

#[tokio::test]
async fn test_url_without_search_is_judged_from_address() {
    let judge = Arc::new(FakeJudge::new());
    let orchestrator =
        EvidenceOrchestrator::new(None::<FakeSearch>, FakeFetcher::new(), Arc::clone(&judge)).with_pacing(NoPacing);

    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(report.stages, [Stage::Init, Stage::KeywordDerived, Stage::AiOnlyFallback]);
    let verdict = &report.verdict;
    assert!(verdict.is_fake);
    assert_eq!(verdict.confidence, 70);
    assert_eq!(verdict.sources_analyzed, 0);
    assert!(!verdict.web_evidence_used);
    assert_eq!(verdict.phase_used, PhaseUsed::None);
    assert!(verdict.limited_analysis);
    assert_eq!(verdict.limit_reason.as_deref(), Some(LIMIT_SEARCH_NOT_CONFIGURED));
    assert!(verdict.search_queries.is_empty());

    let prompts = judge.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, JudgeCall::Claim);
    assert!(prompts[0].1.contains(ARTICLE_URL));
}

#[tokio::test]
async fn test_address_only_model_failure_is_low_confidence() {
    let orchestrator = pipeline(None, FakeFetcher::new(), FakeJudge::failing());

    let verdict = orchestrator.analyze(ARTICLE_URL).await.expect("report").verdict;

    assert!(!verdict.is_fake);
    assert_eq!(verdict.confidence, AI_ONLY_FAILURE_CONFIDENCE);
    assert!(verdict.reason.contains("Lỗi phân tích URL"));
    assert_eq!(verdict.limit_reason.as_deref(), Some(LIMIT_SEARCH_NOT_CONFIGURED));
    assert_eq!(verdict.original_url.as_deref(), Some(ARTICLE_URL));
}

#[tokio::test]
async fn test_phase_one_quota_short_circuits() {
    let search = Arc::new(FakeSearch::quota_exhausted());
    let fetcher = Arc::new(FakeFetcher::new());
    let orchestrator = EvidenceOrchestrator::new(Some(Arc::clone(&search)), Arc::clone(&fetcher), FakeJudge::new())
        .with_pacing(NoPacing);

    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(search.calls().len(), 1);
    assert!(fetcher.calls().is_empty());
    assert_eq!(report.final_stage(), Some(Stage::AiOnlyFallback));
    assert_eq!(report.verdict.sources_analyzed, 0);
    assert_eq!(report.verdict.limit_reason.as_deref(), Some(LIMIT_QUOTA_EXHAUSTED));
    // The failed query is still reported
    assert_eq!(report.verdict.search_queries.len(), 1);
    assert!(report.evidence.queries[0].error.is_some());
}

#[tokio::test]
async fn test_phase_two_quota_keeps_phase_one_evidence() {
    let phase_two_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&phase_two_calls);
    let search = FakeSearch::new(move |query| {
        if is_first_phase(query) {
            Ok(vec![result(FIRST_A), result(FIRST_B)])
        } else {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(SearchError::QuotaExceeded("daily limit".into()))
        }
    });
    let orchestrator = pipeline(Some(search), all_sources(), FakeJudge::new());

    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(phase_two_calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.final_stage(), Some(Stage::Synthesized));
    assert_eq!(report.verdict.sources_analyzed, 2);
    assert_eq!(report.verdict.phase_used, PhaseUsed::TwoPhase);
    assert!(!report.verdict.limited_analysis);
}

#[tokio::test]
async fn test_nothing_fetched_falls_back_to_address() {
    let orchestrator = pipeline(Some(two_phase_search()), FakeFetcher::new(), FakeJudge::new());

    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(report.final_stage(), Some(Stage::AiOnlyFallback));
    assert_eq!(report.verdict.limit_reason.as_deref(), Some(LIMIT_NOTHING_FETCHED));
    assert_eq!(report.verdict.sources_analyzed, 0);
    assert_eq!(report.verdict.search_queries.len(), 3);
    assert_eq!(report.statistics.sources_failed, 2);
}

#[tokio::test]
async fn test_topic_failure_gives_simplified_single_search() {
    let judge = FakeJudge {
        topics: Err(JudgmentError::Parse("no JSON object found in model output".into())),
        ..FakeJudge::new()
    };
    let orchestrator = pipeline(Some(two_phase_search()), all_sources(), judge);

    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(report.final_stage(), Some(Stage::SimplifiedFallback));
    let verdict = &report.verdict;
    assert!(!verdict.is_fake);
    assert_eq!(verdict.confidence, NEUTRAL_CONFIDENCE);
    assert_eq!(verdict.phase_used, PhaseUsed::SingleSearch);
    assert_eq!(verdict.sources_analyzed, 2);
    assert_eq!(verdict.limit_reason.as_deref(), Some(LIMIT_TWO_PHASE_INCOMPLETE));
    assert!(verdict.identified_title.is_none());
    assert!(verdict.reason.contains(ARTICLE_URL));
}

#[tokio::test]
async fn test_synthesis_failure_gives_simplified_two_phase() {
    let judge = FakeJudge {
        synthesis: Err(JudgmentError::EmptyResponse),
        ..FakeJudge::new()
    };
    let orchestrator = pipeline(Some(two_phase_search()), all_sources(), judge);

    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(report.final_stage(), Some(Stage::SimplifiedFallback));
    assert!(report.stages.contains(&Stage::SecondFetchDone));
    let verdict = &report.verdict;
    assert_eq!(verdict.confidence, NEUTRAL_CONFIDENCE);
    assert_eq!(verdict.phase_used, PhaseUsed::TwoPhase);
    assert_eq!(verdict.sources_analyzed, 3);
    assert_eq!(verdict.identified_title.as_deref(), Some(sample_topic().main_title()));
}

// =============================================================================
// Text flow
// =============================================================================

#[tokio::test]
async fn test_text_with_no_hits_is_judged_alone() {
    let orchestrator = pipeline(Some(FakeSearch::always(Vec::new())), FakeFetcher::new(), FakeJudge::new());

    let report = orchestrator.analyze(CLAIM).await.expect("report");

    assert_eq!(report.input_kind, InputKind::Text);
    assert_eq!(
        report.stages,
        [Stage::Init, Stage::TextSearchDone, Stage::TextFetchDone, Stage::ClaimOnlyJudged]
    );
    let verdict = &report.verdict;
    assert!(!verdict.web_evidence_used);
    assert_eq!(verdict.sources_analyzed, 0);
    assert_eq!(verdict.phase_used, PhaseUsed::None);
    assert!(!verdict.limited_analysis);
    assert_eq!(verdict.search_queries.len(), 4);
    assert!(verdict.original_url.is_none());
}

#[tokio::test]
async fn test_text_with_evidence_is_judged_on_content() {
    let judge = Arc::new(FakeJudge::new());
    let search = FakeSearch::always(vec![result(FIRST_A), result("https://www.tiktok.com/@a/1"), result(FIRST_B)]);
    let orchestrator =
        EvidenceOrchestrator::new(Some(search), all_sources(), Arc::clone(&judge)).with_pacing(NoPacing);

    let report = orchestrator.analyze(CLAIM).await.expect("report");

    assert_eq!(report.final_stage(), Some(Stage::ContentJudged));
    let verdict = &report.verdict;
    assert!(verdict.is_fake);
    assert_eq!(verdict.confidence, 70);
    assert_eq!(verdict.phase_used, PhaseUsed::SingleSearch);
    assert_eq!(verdict.sources_analyzed, 2);
    assert!(verdict.web_evidence_used);

    let (_, prompt) = judge
        .prompts()
        .into_iter()
        .rfind(|(call, _)| *call == JudgeCall::Claim)
        .expect("claim judged");
    assert!(prompt.contains(CLAIM));
    assert!(prompt.contains(FIRST_A));
    assert!(prompt.contains(FIRST_B));
}

#[tokio::test]
async fn test_deep_analysis_feeds_the_judgment() {
    let judge = FakeJudge {
        analysis: Ok(EvidenceAnalysis {
            detailed_analysis: "Các nguồn đều xác nhận sự kiện".to_string(),
            ..EvidenceAnalysis::default()
        }),
        ..FakeJudge::new()
    };
    let judge = Arc::new(judge);
    let settings = PipelineSettings {
        deep_analysis_min_chars: 10,
        ..PipelineSettings::default()
    };
    let search = FakeSearch::always(vec![result(FIRST_A)]);
    let orchestrator = EvidenceOrchestrator::new(Some(search), all_sources(), Arc::clone(&judge))
        .with_pacing(NoPacing)
        .with_settings(settings);

    let report = orchestrator.analyze(CLAIM).await.expect("report");

    assert_eq!(
        report.stages,
        [
            Stage::Init,
            Stage::TextSearchDone,
            Stage::TextFetchDone,
            Stage::EvidenceAnalyzed,
            Stage::ContentJudged,
        ]
    );
    assert_eq!(judge.calls(), [JudgeCall::Analysis, JudgeCall::Claim]);
}

#[tokio::test]
async fn test_text_judgment_failure_is_neutral() {
    let search = FakeSearch::always(vec![result(FIRST_A)]);
    let orchestrator = pipeline(Some(search), all_sources(), FakeJudge::failing());

    let verdict = orchestrator.analyze(CLAIM).await.expect("report").verdict;

    assert!(!verdict.is_fake);
    assert_eq!(verdict.confidence, NEUTRAL_CONFIDENCE);
    assert_eq!(verdict.sources_analyzed, 1);
    assert_eq!(verdict.phase_used, PhaseUsed::SingleSearch);
    assert_eq!(verdict.limit_reason.as_deref(), Some(LIMIT_MODEL_UNAVAILABLE));
}

#[tokio::test]
async fn test_text_without_search_is_limited() {
    let orchestrator = pipeline(None, FakeFetcher::new(), FakeJudge::new());

    let report = orchestrator.analyze(CLAIM).await.expect("report");

    assert_eq!(report.stages, [Stage::Init, Stage::ClaimOnlyJudged]);
    assert_eq!(report.verdict.limit_reason.as_deref(), Some(LIMIT_SEARCH_NOT_CONFIGURED));
    assert!(report.verdict.search_queries.is_empty());
}

#[tokio::test]
async fn test_failed_text_query_does_not_stop_the_round() {
    let search = FakeSearch::new(|query| {
        if query.starts_with('"') {
            Err(SearchError::Http {
                status: 500,
                message: "backend error".into(),
            })
        } else {
            Ok(vec![result(FIRST_A)])
        }
    });
    let orchestrator = pipeline(Some(search), all_sources(), FakeJudge::new());

    let report = orchestrator.analyze(CLAIM).await.expect("report");

    assert_eq!(report.evidence.queries.len(), 4);
    assert_eq!(report.evidence.queries.iter().filter(|q| q.error.is_some()).count(), 1);
    assert_eq!(report.verdict.sources_analyzed, 1);
}

// =============================================================================
// Input handling and reporting
// =============================================================================

#[tokio::test]
async fn test_blank_input_is_rejected() {
    let orchestrator = pipeline(None, FakeFetcher::new(), FakeJudge::new());
    assert!(matches!(orchestrator.analyze(" \n\t ").await, Err(PipelineError::EmptyInput)));
}

#[tokio::test]
async fn test_report_serializes_camel_case() {
    let orchestrator = pipeline(Some(two_phase_search()), all_sources(), FakeJudge::new());
    let report = orchestrator.analyze(ARTICLE_URL).await.expect("report");

    let json = serde_json::to_value(&report).expect("serializable");
    assert_eq!(json["inputKind"], "url");
    assert_eq!(json["verdict"]["isFake"], false);
    assert_eq!(json["verdict"]["phaseUsed"], "two-phase");
    assert_eq!(json["verdict"]["sourcesAnalyzed"], 3);
    assert_eq!(json["stages"][0], "init");
    assert_eq!(json["stages"][7], "synthesized");
    assert_eq!(
        json["statistics"]["sourceDomains"],
        serde_json::json!(["vnexpress.net", "tuoitre.vn", "thanhnien.vn"])
    );
    assert_eq!(
        json["statistics"]["totalContentLength"],
        3 * common::LONG_PARAGRAPH.chars().count()
    );
}

// =============================================================================
// Query pacing
// =============================================================================

const QUERY_DELAY: Duration = Duration::from_millis(500);

#[tokio::test(start_paused = true)]
async fn test_configured_delay_separates_queries_within_a_round() {
    let config = FactCheckConfig::builder()
        .gemini_api_key("k")
        .query_delay_ms(500)
        .build()
        .expect("config");
    let search = Arc::new(two_phase_search());
    let orchestrator =
        EvidenceOrchestrator::from_config(&config, Some(Arc::clone(&search)), all_sources(), FakeJudge::new());

    let started = Instant::now();
    orchestrator.analyze(ARTICLE_URL).await.expect("report");

    // 3 phase-1 queries and 5 phase-2 queries; no pause before the first of each round
    assert_eq!(search.calls().len(), 8);
    assert_eq!(started.elapsed(), QUERY_DELAY * (2 + 4));
}

#[tokio::test(start_paused = true)]
async fn test_text_round_pauses_between_queries() {
    let search = Arc::new(FakeSearch::always(vec![result(FIRST_A)]));
    let orchestrator = EvidenceOrchestrator::new(Some(Arc::clone(&search)), all_sources(), FakeJudge::new())
        .with_pacing(FixedDelay(QUERY_DELAY));

    let started = Instant::now();
    orchestrator.analyze(CLAIM).await.expect("report");

    let issued = u32::try_from(search.calls().len()).expect("few queries");
    assert!(issued > 1);
    assert_eq!(started.elapsed(), QUERY_DELAY * (issued - 1));
}

#[tokio::test(start_paused = true)]
async fn test_quota_on_first_query_never_pauses() {
    let search = Arc::new(FakeSearch::quota_exhausted());
    let orchestrator = EvidenceOrchestrator::new(Some(Arc::clone(&search)), all_sources(), FakeJudge::new())
        .with_pacing(FixedDelay(QUERY_DELAY));

    let started = Instant::now();
    orchestrator.analyze(ARTICLE_URL).await.expect("report");

    assert_eq!(search.calls().len(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}
