//! Outcome of fetching one page

use serde::Serialize;

/// Why a fetch produced no usable text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FetchFailureKind {
    /// Transport error, timeout or HTTP status >= 400
    Network,
    /// Page arrived but yielded no useful text
    Extraction,
}

/// Text fetched from one source URL
///
/// A successful fetch always has non-empty `body_text`; a failed one always
/// has an empty `body_text`. Both constructors uphold this, and fields are
/// read through accessors so it cannot be broken afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedContent {
    source_url: String,
    title: String,
    body_text: String,
    byte_length: usize,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_kind: Option<FetchFailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extraction_note: Option<String>,
    attempts: u32,
}

impl FetchedContent {
    /// Successful extraction
    ///
    /// Blank `body_text` cannot be a success and turns into an
    /// [`FetchFailureKind::Extraction`] failure.
    #[must_use]
    pub fn extracted(
        source_url: impl Into<String>,
        title: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        let source_url = source_url.into();
        let body_text = body_text.into();
        if body_text.trim().is_empty() {
            return Self::failed(source_url, FetchFailureKind::Extraction, "no useful content");
        }
        Self {
            source_url,
            title: title.into(),
            byte_length: body_text.len(),
            body_text,
            success: true,
            failure_reason: None,
            failure_kind: None,
            extraction_note: None,
            attempts: 1,
        }
    }

    /// Failed fetch carrying the last error message
    #[must_use]
    pub fn failed(
        source_url: impl Into<String>,
        kind: FetchFailureKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            title: String::new(),
            body_text: String::new(),
            byte_length: 0,
            success: false,
            failure_reason: Some(reason.into()),
            failure_kind: Some(kind),
            extraction_note: None,
            attempts: 1,
        }
    }

    /// Tag a success that came from a degraded extraction path
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        if self.success {
            self.extraction_note = Some(note.into());
        }
        self
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// UTF-8 byte length of `body_text`
    #[must_use]
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    #[must_use]
    pub fn char_length(&self) -> usize {
        self.body_text.chars().count()
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    #[must_use]
    pub fn failure_kind(&self) -> Option<FetchFailureKind> {
        self.failure_kind
    }

    #[must_use]
    pub fn extraction_note(&self) -> Option<&str> {
        self.extraction_note.as_deref()
    }

    /// HTTP attempts made, first attempt included
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
