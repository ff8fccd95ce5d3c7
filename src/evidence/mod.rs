//! Shared evidence data model
//!
//! Types that flow between the fetcher, the judgment client and the
//! orchestrator. All of it is per-request state; nothing here is shared
//! between runs.

mod bundle;
mod fetched;
mod topic;
mod verdict;

pub use bundle::{
    EvidenceBundle, EvidenceStatistics, EvidenceSummary, Phase, PhaseQuery, PhasedContent,
    SourceSummary,
};
pub use fetched::{FetchFailureKind, FetchedContent};
pub use topic::TopicProfile;
pub use verdict::{PhaseUsed, Verdict};

pub use crate::web_search::SearchResult;
