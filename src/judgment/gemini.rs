//! Gemini `generateContent` client
//!
//! POST `{base}/v1beta/models/{model}:generateContent` with the API key in the
//! `x-goog-api-key` header and JSON output requested through
//! `responseMimeType`. Candidate text parts are concatenated and parsed by
//! [`super::parse`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::parse::{self, EvidenceAnalysis, ModelVerdict};
use super::{JudgmentClient, JudgmentError};
use crate::config::{DEFAULT_GEMINI_BASE_URL, FactCheckConfig};
use crate::evidence::TopicProfile;
use crate::utils::{DEFAULT_GEMINI_MODEL, DEFAULT_JUDGMENT_TIMEOUT, REDACTED};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Extra attempts after a transient failure
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Concatenate the text parts of the first candidate
///
/// # Errors
///
/// Returns [`JudgmentError::Parse`] if `body` is not a response object and
/// [`JudgmentError::EmptyResponse`] if it carries no text.
pub fn extract_candidate_text(body: &str) -> Result<String, JudgmentError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| JudgmentError::Parse(e.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(JudgmentError::EmptyResponse);
    }
    Ok(text)
}

// =============================================================================
// Client
// =============================================================================

/// Judgment client backed by the Gemini API
///
/// Transient failures (transport errors, 429, 5xx) are retried up to
/// `max_retries` times with a linearly growing delay.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_retries: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &REDACTED)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Client with default model, endpoint and timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, JudgmentError> {
        Self::with_timeout(api_key, DEFAULT_JUDGMENT_TIMEOUT)
    }

    /// Client with an explicit per-call timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, JudgmentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JudgmentError::Request(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: 0.2,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Client configured from model, endpoint, timeout and temperature settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &FactCheckConfig) -> Result<Self, JudgmentError> {
        Ok(Self::with_timeout(config.gemini_api_key(), config.judgment_timeout())?
            .with_model(config.gemini_model())
            .with_base_url(config.gemini_base_url())
            .with_temperature(config.temperature()))
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Retry transient failures `max_retries` times, waiting `delay * attempt`
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send `prompt` and return the model's raw text
    ///
    /// # Errors
    ///
    /// Returns [`JudgmentError`] on transport failure, a non-success status
    /// or a response without text. Only the last error of a retried call is
    /// returned.
    pub async fn generate(&self, prompt: &str) -> Result<String, JudgmentError> {
        let mut retries = 0;
        loop {
            match self.generate_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if !e.is_transient() || retries >= self.max_retries => return Err(e),
                Err(e) => {
                    retries += 1;
                    let delay = self.retry_delay * retries;
                    warn!(
                        model = %self.model,
                        attempt = retries,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient judgment failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, JudgmentError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json",
            },
        };

        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Calling judgment model");
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| JudgmentError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JudgmentError::Request(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(model = %self.model, status = status.as_u16(), %message, "Judgment call failed");
            return Err(JudgmentError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_candidate_text(&body)?;
        info!(model = %self.model, response_chars = text.chars().count(), "Judgment model answered");
        Ok(text)
    }
}

impl JudgmentClient for GeminiClient {
    async fn extract_topics(&self, prompt: &str) -> Result<TopicProfile, JudgmentError> {
        parse::parse_topics(&self.generate(prompt).await?)
    }

    async fn synthesize(&self, prompt: &str) -> Result<ModelVerdict, JudgmentError> {
        parse::parse_verdict(&self.generate(prompt).await?)
    }

    async fn judge_claim(&self, prompt: &str) -> Result<ModelVerdict, JudgmentError> {
        parse::parse_verdict(&self.generate(prompt).await?)
    }

    async fn analyze_evidence(&self, prompt: &str) -> Result<EvidenceAnalysis, JudgmentError> {
        parse::parse_evidence_analysis(&self.generate(prompt).await?)
    }
}
