//! Judgment model seam
//!
//! The pipeline treats the language model as an opaque "judge given this
//! prompt" collaborator. Each call returns a typed result or a
//! [`JudgmentError`]; the orchestrator turns any error into "this phase
//! yielded nothing" and falls back accordingly.

mod gemini;
pub mod parse;
pub mod prompts;

pub use gemini::{GeminiClient, extract_candidate_text};
pub use parse::{EvidenceAnalysis, ModelVerdict};

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::evidence::TopicProfile;

/// Error types for judgment calls
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JudgmentError {
    /// Transport failure or timeout
    #[error("Judgment request failed: {0}")]
    Request(String),

    /// Non-success HTTP status
    #[error("Judgment API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Model answered but produced no text
    #[error("Judgment model returned an empty response")]
    EmptyResponse,

    /// Output did not contain the expected JSON
    #[error("Failed to parse judgment output: {0}")]
    Parse(String),

    /// Topic profile parsed but is unusable
    #[error("Unusable topic profile: {0}")]
    InvalidTopics(String),

    /// The client does not implement this call
    #[error("{0} is not supported by this judgment client")]
    Unsupported(&'static str),
}

impl JudgmentError {
    /// Check if error is transient and a later call could succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            JudgmentError::Request(_) => true,
            JudgmentError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// A language-model judge
pub trait JudgmentClient: Send + Sync {
    /// Identify the main title and key topics behind first-phase sources
    fn extract_topics(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<TopicProfile, JudgmentError>> + Send;

    /// Final two-phase verdict
    fn synthesize(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<ModelVerdict, JudgmentError>> + Send;

    /// Single-pass verdict (text claims, URL without search)
    fn judge_claim(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<ModelVerdict, JudgmentError>> + Send;

    /// Optional deep reading of evidence; unsupported unless overridden
    fn analyze_evidence(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<EvidenceAnalysis, JudgmentError>> + Send {
        let _ = prompt;
        async { Err(JudgmentError::Unsupported("evidence analysis")) }
    }
}

impl<T: JudgmentClient> JudgmentClient for Arc<T> {
    fn extract_topics(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<TopicProfile, JudgmentError>> + Send {
        (**self).extract_topics(prompt)
    }

    fn synthesize(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<ModelVerdict, JudgmentError>> + Send {
        (**self).synthesize(prompt)
    }

    fn judge_claim(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<ModelVerdict, JudgmentError>> + Send {
        (**self).judge_claim(prompt)
    }

    fn analyze_evidence(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<EvidenceAnalysis, JudgmentError>> + Send {
        (**self).analyze_evidence(prompt)
    }
}
