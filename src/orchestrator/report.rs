//! Caller-facing result of one analysis

use serde::Serialize;
use thiserror::Error;

use super::state::Stage;
use crate::evidence::{EvidenceBundle, EvidenceStatistics, EvidenceSummary, Verdict};
use crate::utils::is_valid_url;

/// How the input was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Text,
}

impl InputKind {
    /// Absolute `http`/`https` URLs take the URL flow; everything else is text
    #[must_use]
    pub fn classify(input: &str) -> Self {
        if is_valid_url(input) {
            InputKind::Url
        } else {
            InputKind::Text
        }
    }
}

/// The only failure `analyze` surfaces; everything else degrades the verdict
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Input is empty")]
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub input_kind: InputKind,
    pub verdict: Verdict,
    pub evidence: EvidenceSummary,
    pub statistics: EvidenceStatistics,
    pub stages: Vec<Stage>,
}

impl AnalysisReport {
    pub(crate) fn new(input_kind: InputKind, verdict: Verdict, bundle: &EvidenceBundle, stages: Vec<Stage>) -> Self {
        Self {
            input_kind,
            verdict,
            evidence: bundle.summary(),
            statistics: bundle.statistics(),
            stages,
        }
    }

    /// Stage the run ended in
    #[must_use]
    pub fn final_stage(&self) -> Option<Stage> {
        self.stages.last().copied()
    }
}
