//! Evidence pipeline for claim verification
//!
//! Takes a free-text claim or a news URL, gathers web evidence in one or two
//! search phases and asks a judgment model for a verdict with confidence,
//! indicators and provenance.

pub mod config;
pub mod content_fetcher;
pub mod evidence;
pub mod history;
pub mod judgment;
pub mod keywords;
pub mod orchestrator;
pub mod page_extractor;
pub mod trust;
pub mod utils;
pub mod web_search;

pub use config::{ConfigError, FactCheckConfig, PipelineSettings, SearchCredentials};
pub use content_fetcher::{ContentFetcher, PageFetcher, fetch_all};
pub use evidence::{
    EvidenceBundle, EvidenceStatistics, EvidenceSummary, FetchFailureKind, FetchedContent, Phase,
    PhaseUsed, TopicProfile, Verdict,
};
pub use history::{HistoryEntry, HistoryStatistics, HistoryStore, InMemoryHistoryStore};
pub use judgment::{EvidenceAnalysis, GeminiClient, JudgmentClient, JudgmentError, ModelVerdict};
pub use keywords::{KeywordExtractor, extract_keywords};
pub use orchestrator::{AnalysisReport, EvidenceOrchestrator, InputKind, PipelineError, Stage};
pub use page_extractor::{ExtractedPage, MetadataFallback, extract_body, extract_metadata_fallback, extract_page, extract_title};
pub use trust::{TrustPolicy, TrustRanker};
pub use web_search::{GoogleSearchClient, SearchError, SearchProvider, SearchResult};
