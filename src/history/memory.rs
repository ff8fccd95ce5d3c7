//! Bounded in-memory history

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{HistoryEntry, HistoryStatistics, HistoryStore};
use crate::orchestrator::AnalysisReport;
use crate::utils::MAX_HISTORY_ITEMS;

/// History kept in process memory, capped at a fixed number of entries
///
/// Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub struct InMemoryHistoryStore {
    entries: Arc<RwLock<VecDeque<HistoryEntry>>>,
    capacity: usize,
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_ITEMS)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(&self, input: &str, report: AnalysisReport) -> HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input: input.to_string(),
            report,
        };

        let mut entries = self.entries.write();
        entries.push_front(entry.clone());
        entries.truncate(self.capacity);
        log::info!(
            "Stored {:?} analysis in history ({} entries)",
            entry.report.input_kind,
            entries.len()
        );
        entry
    }

    fn list(&self) -> Vec<HistoryEntry> {
        self.entries.read().iter().cloned().collect()
    }

    fn get(&self, id: Uuid) -> Option<HistoryEntry> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    fn delete(&self, id: Uuid) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        before != entries.len()
    }

    fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let dropped = entries.len();
        entries.clear();
        log::debug!("Cleared {dropped} history entries");
        dropped
    }

    fn search(&self, term: &str) -> Vec<HistoryEntry> {
        let term = term.trim().to_lowercase();
        let entries = self.entries.read();
        if term.is_empty() {
            return entries.iter().cloned().collect();
        }
        entries
            .iter()
            .filter(|e| {
                e.input.to_lowercase().contains(&term)
                    || e.report.verdict.reason.to_lowercase().contains(&term)
            })
            .cloned()
            .collect()
    }

    fn statistics(&self) -> HistoryStatistics {
        HistoryStatistics::compute(self.entries.read().iter(), Utc::now())
    }
}
