//! Parsing of judgment model output
//!
//! Models wrap JSON in prose or code fences and are loose with types
//! (`"confidence": "85%"`, `"isFakeNews": "false"`, `null` strings). The
//! object between the first `{` and the last `}` is parsed and every field
//! is read leniently.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::JudgmentError;
use crate::evidence::TopicProfile;

/// Confidence assumed when the model omits it
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// Keys owned by the pipeline; a model echoing them back must not override them
const RESERVED_KEYS: &[&str] = &[
    "isFake",
    "isFakeNews",
    "is_fake",
    "confidence",
    "reason",
    "indicators",
    "recommendation",
    "sourcesAnalyzed",
    "webEvidenceUsed",
    "phaseUsed",
    "limitedAnalysis",
    "limitReason",
    "reason_limited",
    "searchQueries",
    "identifiedTitle",
    "keyTopics",
    "originalUrl",
    "twoStepProcess",
    "error",
];

// =============================================================================
// Lenient field readers
// =============================================================================

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

fn lenient_string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(values) => values.into_iter().map(value_to_string).collect(),
        Value::String(s) => s.split(',').map(|part| part.trim().to_string()).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    };
    Ok(items.into_iter().filter(|s: &String| !s.is_empty()).collect())
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!("not a boolean: {other:?}"))),
        },
        other => Err(serde::de::Error::custom(format!("not a boolean: {other}"))),
    }
}

/// Clamp any numeric reading into 0..=100
#[must_use]
pub fn clamp_confidence(raw: f64) -> u8 {
    if raw.is_nan() {
        return DEFAULT_CONFIDENCE;
    }
    // Clamped first, so the cast cannot truncate
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamped = raw.round().clamp(0.0, 100.0) as u8;
    clamped
}

fn lenient_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_f64().map_or(DEFAULT_CONFIDENCE, clamp_confidence)),
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches('%').trim();
            trimmed
                .parse::<f64>()
                .map(clamp_confidence)
                .map_err(|_| serde::de::Error::custom(format!("not a confidence: {s:?}")))
        }
        Value::Null => Ok(DEFAULT_CONFIDENCE),
        other => Err(serde::de::Error::custom(format!("not a confidence: {other}"))),
    }
}

fn default_confidence() -> u8 {
    DEFAULT_CONFIDENCE
}

// =============================================================================
// Model-facing shapes
// =============================================================================

/// Verdict fields produced by the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVerdict {
    #[serde(alias = "isFakeNews", alias = "is_fake", deserialize_with = "lenient_bool")]
    pub is_fake: bool,
    #[serde(default = "default_confidence", deserialize_with = "lenient_confidence")]
    pub confidence: u8,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub indicators: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recommendation: String,
    /// Any other analysis the model returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deep analysis of fetched evidence against a claim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub detailed_analysis: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub supporting_evidence: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub contradicting_evidence: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub contextual_factors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cross_reference_findings: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_based_conclusion: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTopicProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    main_title: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    key_topics: Vec<String>,
    #[serde(default, alias = "coreContent", deserialize_with = "lenient_string")]
    core_summary: String,
    #[serde(default, alias = "mainEntities", deserialize_with = "lenient_string_list")]
    entities: Vec<String>,
    #[serde(default, alias = "eventLocation", deserialize_with = "lenient_string")]
    location: String,
    #[serde(default, alias = "eventType", deserialize_with = "lenient_string")]
    category: String,
    #[serde(default, alias = "urgencyLevel", deserialize_with = "lenient_string")]
    urgency: String,
}

// =============================================================================
// Entry points
// =============================================================================

/// The span from the first `{` to the last `}` of `text`
///
/// # Errors
///
/// Returns [`JudgmentError::Parse`] when no such span exists.
pub fn extract_json_object(text: &str) -> Result<&str, JudgmentError> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(JudgmentError::Parse(
            "no JSON object found in model output".to_string(),
        )),
    }
}

/// Parse the JSON object embedded in `text` into `T`
///
/// # Errors
///
/// Returns [`JudgmentError::Parse`] when no object is found or it does not
/// match `T`.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, JudgmentError> {
    let span = extract_json_object(text)?;
    serde_json::from_str(span).map_err(|e| JudgmentError::Parse(e.to_string()))
}

/// Parse a verdict, dropping keys the pipeline computes itself
///
/// # Errors
///
/// Returns [`JudgmentError::Parse`] on malformed output or a missing verdict flag.
pub fn parse_verdict(text: &str) -> Result<ModelVerdict, JudgmentError> {
    let mut verdict: ModelVerdict = parse_model_json(text)?;
    verdict
        .extra
        .retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
    Ok(verdict)
}

/// Parse a topic profile and validate it
///
/// # Errors
///
/// Returns [`JudgmentError::Parse`] on malformed output and
/// [`JudgmentError::InvalidTopics`] when the title or every topic is blank.
pub fn parse_topics(text: &str) -> Result<TopicProfile, JudgmentError> {
    let raw: RawTopicProfile = parse_model_json(text)?;
    let profile = TopicProfile::new(raw.main_title.clone(), raw.key_topics).ok_or_else(|| {
        JudgmentError::InvalidTopics(format!(
            "main title {:?} with no usable key topics or a blank title",
            raw.main_title
        ))
    })?;
    Ok(profile
        .with_core_summary(raw.core_summary)
        .with_entities(raw.entities)
        .with_location(raw.location)
        .with_category(raw.category)
        .with_urgency(raw.urgency))
}

/// Parse a deep evidence analysis
///
/// # Errors
///
/// Returns [`JudgmentError::Parse`] on malformed output.
pub fn parse_evidence_analysis(text: &str) -> Result<EvidenceAnalysis, JudgmentError> {
    parse_model_json(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_span_ignores_surrounding_prose() -> Result<(), JudgmentError> {
        let text = "Đây là kết quả:\n```json\n{\"a\": {\"b\": 1}}\n```\nHết.";
        assert_eq!(extract_json_object(text)?, "{\"a\": {\"b\": 1}}");
        assert!(extract_json_object("} no object {").is_err());
        Ok(())
    }

    #[test]
    fn verdict_accepts_loose_types() -> Result<(), JudgmentError> {
        let verdict = parse_verdict(
            r#"{"isFakeNews": "false", "confidence": "85%", "reason": "ok",
                "indicators": "a, b", "recommendation": null}"#,
        )?;
        assert!(!verdict.is_fake);
        assert_eq!(verdict.confidence, 85);
        assert_eq!(verdict.indicators, vec!["a", "b"]);
        assert_eq!(verdict.recommendation, "");
        Ok(())
    }

    #[test]
    fn confidence_is_clamped_and_rounded() {
        assert_eq!(clamp_confidence(150.0), 100);
        assert_eq!(clamp_confidence(-3.0), 0);
        assert_eq!(clamp_confidence(72.6), 73);
        assert_eq!(clamp_confidence(f64::NAN), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn reserved_keys_are_stripped_from_extra() -> Result<(), JudgmentError> {
        let verdict = parse_verdict(
            r#"{"isFakeNews": true, "confidence": 90, "sourcesAnalyzed": 99,
                "consistencyCheck": "cao"}"#,
        )?;
        assert!(verdict.extra.get("sourcesAnalyzed").is_none());
        assert_eq!(verdict.extra.get("consistencyCheck"), Some(&Value::from("cao")));
        Ok(())
    }

    #[test]
    fn missing_verdict_flag_is_a_parse_error() {
        assert!(matches!(
            parse_verdict(r#"{"confidence": 80}"#),
            Err(JudgmentError::Parse(_))
        ));
    }

    #[test]
    fn topics_accept_model_field_names() -> Result<(), JudgmentError> {
        let profile = parse_topics(
            r#"{"mainTitle": "Bão Yagi", "keyTopics": ["bão", "Yagi"],
                "coreContent": "tóm tắt", "mainEntities": ["NCHMF"],
                "eventLocation": "Quảng Ninh", "eventType": "thiên tai", "urgencyLevel": "high"}"#,
        )?;
        assert_eq!(profile.core_summary(), "tóm tắt");
        assert_eq!(profile.location(), "Quảng Ninh");
        assert_eq!(profile.urgency(), "high");
        Ok(())
    }

    #[test]
    fn blank_topics_are_rejected() {
        assert!(matches!(
            parse_topics(r#"{"mainTitle": "X", "keyTopics": []}"#),
            Err(JudgmentError::InvalidTopics(_))
        ));
    }
}
