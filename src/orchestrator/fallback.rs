//! Verdicts produced without a usable model answer

use crate::evidence::{PhaseUsed, Verdict};
use crate::judgment::ModelVerdict;

pub const LIMIT_SEARCH_NOT_CONFIGURED: &str = "search not configured";
pub const LIMIT_QUOTA_EXHAUSTED: &str = "search quota exhausted";
pub const LIMIT_NOTHING_FETCHED: &str = "no sources could be fetched";
pub const LIMIT_TWO_PHASE_INCOMPLETE: &str = "two-phase process could not be completed";
pub const LIMIT_MODEL_UNAVAILABLE: &str = "judgment model unavailable";

/// Confidence of the address-only verdict when the model call fails
pub const AI_ONLY_FAILURE_CONFIDENCE: u8 = 20;
/// Confidence of every other deterministic verdict
pub const NEUTRAL_CONFIDENCE: u8 = 50;

impl From<ModelVerdict> for Verdict {
    fn from(model: ModelVerdict) -> Self {
        Verdict::new(
            model.is_fake,
            model.confidence,
            model.reason,
            model.indicators,
            model.recommendation,
        )
        .with_extra(model.extra)
    }
}

/// URL judged without sources and without a model answer
#[must_use]
pub fn ai_only_failure(url: &str, error: &str, limit_reason: &str) -> Verdict {
    Verdict::new(
        false,
        AI_ONLY_FAILURE_CONFIDENCE,
        format!("Lỗi phân tích URL {url}: {error}"),
        vec!["Lỗi hệ thống".to_string()],
        "Cần kiểm tra thủ công",
    )
    .with_sources(0, PhaseUsed::None)
    .limited(limit_reason)
    .with_original_url(url)
}

/// Two-phase run that could not finish
#[must_use]
pub fn simplified(url: &str, sources: usize, phase_used: PhaseUsed) -> Verdict {
    Verdict::new(
        false,
        NEUTRAL_CONFIDENCE,
        format!("Phân tích đơn giản cho {url} với {sources} nguồn"),
        vec!["Phân tích cơ bản - cần xác minh toàn diện hơn".to_string()],
        "Cần xác minh bổ sung từ nhiều nguồn tin đáng tin cậy",
    )
    .with_sources(sources, phase_used)
    .limited(LIMIT_TWO_PHASE_INCOMPLETE)
    .with_original_url(url)
}

/// Text claim whose judgment call failed
#[must_use]
pub fn text_judgment_failure(sources: usize) -> Verdict {
    let (reason, recommendation, phase_used) = if sources > 0 {
        (
            format!("Lỗi phân tích nâng cao - đã tìm thấy {sources} nguồn nhưng không xử lý được"),
            "Đã thu thập bằng chứng web nhưng cần xem xét thủ công",
            PhaseUsed::SingleSearch,
        )
    } else {
        (
            "Lỗi phân tích - cần xác minh thủ công".to_string(),
            "Vui lòng kiểm tra từ nhiều nguồn tin đáng tin cậy",
            PhaseUsed::None,
        )
    };
    Verdict::new(
        false,
        NEUTRAL_CONFIDENCE,
        reason,
        vec!["Lỗi xử lý phân tích".to_string()],
        recommendation,
    )
    .with_sources(sources, phase_used)
    .limited(LIMIT_MODEL_UNAVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplified_keeps_source_count() {
        let verdict = simplified("https://a.vn/x", 3, PhaseUsed::TwoPhase);
        assert_eq!(verdict.confidence, NEUTRAL_CONFIDENCE);
        assert_eq!(verdict.sources_analyzed, 3);
        assert!(verdict.web_evidence_used);
        assert_eq!(verdict.limit_reason.as_deref(), Some(LIMIT_TWO_PHASE_INCOMPLETE));
    }

    #[test]
    fn text_failure_without_sources_uses_no_phase() {
        let verdict = text_judgment_failure(0);
        assert_eq!(verdict.phase_used, PhaseUsed::None);
        assert!(verdict.limited_analysis);
    }
}
