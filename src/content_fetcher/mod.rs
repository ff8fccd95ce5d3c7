//! Resilient single-page fetching with text extraction
//!
//! [`ContentFetcher`] downloads one URL with browser-like headers, streams the
//! body under a size cap and hands it to [`crate::page_extractor`]. It never
//! returns an error: every outcome is a [`FetchedContent`], failed or not.
//!
//! Network failures (transport errors, timeouts, HTTP status >= 400) are
//! retried up to `max_attempts` total attempts with backoff. Extraction
//! failures are final: the same bytes would extract the same way.

mod fan_out;
mod policy;

pub use fan_out::fetch_all;
pub use policy::{
    BackoffPolicy, FixedUserAgent, LinearBackoff, NoBackoff, RandomUserAgent, UserAgentRotation,
};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, PRAGMA, UPGRADE_INSECURE_REQUESTS,
    USER_AGENT,
};
use reqwest::{Client, redirect};
use tracing::{debug, info, warn};

use crate::config::FactCheckConfig;
use crate::evidence::{FetchFailureKind, FetchedContent};
use crate::page_extractor::extract_page;
use crate::utils::{
    self, ACCEPT_HTML, DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_TIMEOUT, MAX_PAGE_BYTES,
    MAX_REDIRECTS, MIN_FALLBACK_TEXT_CHARS, MIN_USEFUL_TEXT_CHARS, UNTITLED, char_len,
};

/// Note attached to contents built from `<meta>` tags instead of body text
pub const METADATA_NOTE: &str = "metadata only: main content could not be extracted";

/// Anything that can turn a URL into [`FetchedContent`]
///
/// Implementations must not fail: problems become a failed `FetchedContent`.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchedContent> + Send;
}

impl<T: PageFetcher> PageFetcher for Arc<T> {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchedContent> + Send {
        (**self).fetch(url)
    }
}

impl<T: PageFetcher> PageFetcher for &T {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchedContent> + Send {
        (**self).fetch(url)
    }
}

/// Failure of a single attempt
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Extraction(String),
}

impl AttemptError {
    fn kind(&self) -> FetchFailureKind {
        match self {
            AttemptError::Network(_) => FetchFailureKind::Network,
            AttemptError::Extraction(_) => FetchFailureKind::Extraction,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, AttemptError::Network(_))
    }
}

/// Whether a `Content-Type` may carry an HTML document
fn is_html_like(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.is_empty()
        || mime.starts_with("text/")
        || mime == "application/xhtml+xml"
        || mime == "application/xml"
}

/// HTTP page fetcher
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    timeout: Duration,
    max_attempts: u32,
    user_agents: Arc<dyn UserAgentRotation>,
    backoff: Arc<dyn BackoffPolicy>,
}

/// Builder for [`ContentFetcher`]
#[derive(Debug, Clone)]
pub struct ContentFetcherBuilder {
    timeout: Duration,
    max_attempts: u32,
    user_agents: Arc<dyn UserAgentRotation>,
    backoff: Arc<dyn BackoffPolicy>,
}

impl Default for ContentFetcherBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_attempts: DEFAULT_FETCH_ATTEMPTS,
            user_agents: Arc::new(RandomUserAgent::default()),
            backoff: Arc::new(LinearBackoff::default()),
        }
    }
}

impl ContentFetcherBuilder {
    /// Per-attempt timeout covering connect, headers and body
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts per URL, first attempt included (minimum 1)
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn user_agents(mut self, rotation: impl UserAgentRotation + 'static) -> Self {
        self.user_agents = Arc::new(rotation);
        self
    }

    #[must_use]
    pub fn backoff(mut self, policy: impl BackoffPolicy + 'static) -> Self {
        self.backoff = Arc::new(policy);
        self
    }

    /// Build the fetcher and its HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ContentFetcher> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client for content fetching")?;
        Ok(ContentFetcher {
            client,
            timeout: self.timeout,
            max_attempts: self.max_attempts,
            user_agents: self.user_agents,
            backoff: self.backoff,
        })
    }
}

impl ContentFetcher {
    #[must_use]
    pub fn builder() -> ContentFetcherBuilder {
        ContentFetcherBuilder::default()
    }

    /// Fetcher with default timeout, attempts and policies
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Fetcher configured from timeout, attempts and backoff settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &FactCheckConfig) -> Result<Self> {
        Self::builder()
            .timeout(config.fetch_timeout())
            .max_attempts(config.fetch_attempts())
            .backoff(LinearBackoff {
                base: config.backoff_base(),
            })
            .build()
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url` and extract its text
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute `http`/`https` URL. Anything else fails immediately
    ///   without a request.
    pub async fn fetch_page(&self, url: &str) -> FetchedContent {
        if !utils::is_valid_url(url) {
            return FetchedContent::failed(url, FetchFailureKind::Network, format!("invalid URL: {url}"));
        }

        let mut attempt = 1u32;
        loop {
            debug!(url, attempt, max_attempts = self.max_attempts, "Fetching page");
            match self.attempt(url).await {
                Ok(content) => {
                    info!(url, chars = content.char_length(), attempt, "Fetched page");
                    return content.with_attempts(attempt);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff.delay_for_attempt(attempt);
                    warn!(
                        url,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Fetch attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(url, attempt, error = %e, "Fetch failed");
                    return FetchedContent::failed(url, e.kind(), e.to_string()).with_attempts(attempt);
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<FetchedContent, AttemptError> {
        let html = self.download(url).await?;
        extract_content(url, &html)
    }

    async fn download(&self, url: &str) -> Result<String, AttemptError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(USER_AGENT, self.user_agents.next_user_agent())
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, utils::ACCEPT_LANGUAGE)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .header(UPGRADE_INSECURE_REQUESTS, "1")
            .send()
            .await
            .map_err(|e| self.network_error(&e))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(AttemptError::Network(format!("HTTP status {status}")));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !is_html_like(content_type)
        {
            return Err(AttemptError::Extraction(format!(
                "unsupported content type: {content_type}"
            )));
        }

        // Get expected size and enforce limit BEFORE downloading
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > MAX_PAGE_BYTES as u64 {
            return Err(AttemptError::Extraction(format!(
                "page too large: {expected_size} bytes exceeds limit of {MAX_PAGE_BYTES} bytes"
            )));
        }

        let mut buffer: Vec<u8> = Vec::with_capacity(usize::try_from(expected_size).unwrap_or(0));
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.network_error(&e))?;
            // Check BEFORE accumulating
            if buffer.len() + chunk.len() > MAX_PAGE_BYTES {
                return Err(AttemptError::Extraction(format!(
                    "page exceeded size limit during download (max: {MAX_PAGE_BYTES} bytes)"
                )));
            }
            buffer.extend_from_slice(&chunk);
        }

        if buffer.is_empty() {
            return Err(AttemptError::Extraction("empty response body".to_string()));
        }
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn network_error(&self, error: &reqwest::Error) -> AttemptError {
        if error.is_timeout() {
            AttemptError::Network(format!("timed out after {}s", self.timeout.as_secs_f64()))
        } else {
            AttemptError::Network(error.to_string())
        }
    }
}

impl PageFetcher for ContentFetcher {
    async fn fetch(&self, url: &str) -> FetchedContent {
        self.fetch_page(url).await
    }
}

/// Turn downloaded HTML into content, falling back to metadata
fn extract_content(url: &str, html: &str) -> Result<FetchedContent, AttemptError> {
    let page = extract_page(html);
    let title = if page.title.is_empty() {
        UNTITLED.to_string()
    } else {
        page.title.clone()
    };

    let body_chars = char_len(&page.body_text);
    if body_chars >= MIN_USEFUL_TEXT_CHARS {
        return Ok(FetchedContent::extracted(url, title, page.body_text));
    }

    debug!(url, body_chars, "Body text too short, trying metadata fallback");
    let fallback = page.metadata.combined();
    if char_len(&fallback) > MIN_FALLBACK_TEXT_CHARS {
        let title = match page.metadata.best_title() {
            "" => UNTITLED.to_string(),
            t => t.to_string(),
        };
        return Ok(FetchedContent::extracted(url, title, fallback).with_note(METADATA_NOTE));
    }

    Err(AttemptError::Extraction(format!(
        "no useful content: {body_chars} chars of body text"
    )))
}
