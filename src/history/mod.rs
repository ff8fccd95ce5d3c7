//! Analysis history
//!
//! A caller-side collaborator: the pipeline never writes here. Callers append
//! a finished [`AnalysisReport`] when they want it remembered.

mod memory;

pub use memory::InMemoryHistoryStore;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::evidence::PhaseUsed;
use crate::orchestrator::{AnalysisReport, InputKind};

/// One remembered analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// The analysed claim or URL
    pub input: String,
    pub report: AnalysisReport,
}

/// Counts over a time window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStats {
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
}

/// Aggregate view of the stored history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatistics {
    pub total: usize,
    pub fake_count: usize,
    pub real_count: usize,
    pub url_analyses: usize,
    pub text_analyses: usize,
    pub two_phase_analyses: usize,
    /// Rounded mean confidence, 0 when empty
    pub avg_confidence: u8,
    pub time_stats: TimeStats,
}

impl HistoryStatistics {
    /// Statistics over `entries` relative to `now`
    #[must_use]
    pub fn compute<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>, now: DateTime<Utc>) -> Self {
        let mut stats = Self::default();
        let mut confidence_sum: u64 = 0;
        let week_ago = now - chrono::Duration::days(7);
        let month_ago = now - chrono::Duration::days(30);

        for entry in entries {
            let verdict = &entry.report.verdict;
            stats.total += 1;
            if verdict.is_fake {
                stats.fake_count += 1;
            } else {
                stats.real_count += 1;
            }
            match entry.report.input_kind {
                InputKind::Url => stats.url_analyses += 1,
                InputKind::Text => stats.text_analyses += 1,
            }
            if verdict.phase_used == PhaseUsed::TwoPhase {
                stats.two_phase_analyses += 1;
            }
            confidence_sum += u64::from(verdict.confidence);

            if entry.timestamp.date_naive() == now.date_naive() {
                stats.time_stats.today += 1;
            }
            if entry.timestamp >= week_ago {
                stats.time_stats.this_week += 1;
            }
            if entry.timestamp >= month_ago {
                stats.time_stats.this_month += 1;
            }
        }

        if stats.total > 0 {
            let total = stats.total as u64;
            let mean = (confidence_sum + total / 2) / total;
            stats.avg_confidence = u8::try_from(mean).unwrap_or(100);
        }
        stats
    }
}

/// Storage for past analyses, newest first
pub trait HistoryStore: Send + Sync {
    /// Remember a report; returns the stored entry
    fn append(&self, input: &str, report: AnalysisReport) -> HistoryEntry;

    /// All entries, newest first
    fn list(&self) -> Vec<HistoryEntry>;

    fn get(&self, id: Uuid) -> Option<HistoryEntry>;

    /// Returns whether an entry was removed
    fn delete(&self, id: Uuid) -> bool;

    /// Remove everything; returns how many entries were dropped
    fn clear(&self) -> usize;

    /// Entries whose input or verdict reason contains `term` (case-insensitive)
    fn search(&self, term: &str) -> Vec<HistoryEntry>;

    fn statistics(&self) -> HistoryStatistics;
}
