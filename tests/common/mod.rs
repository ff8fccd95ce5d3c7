//! Test utilities and fake collaborators for the factcheck test suite

use std::collections::HashMap;

use kodegen_tools_factcheck::evidence::{FetchFailureKind, FetchedContent, TopicProfile};
use kodegen_tools_factcheck::judgment::{EvidenceAnalysis, JudgmentClient, JudgmentError, ModelVerdict};
use kodegen_tools_factcheck::web_search::{SearchError, SearchProvider, SearchResult};
use kodegen_tools_factcheck::PageFetcher;
use mockito::{Mock, Server};
use parking_lot::Mutex;
use serde_json::Map;

// =============================================================================
// HTML fixtures
// =============================================================================

/// Creates a test HTML document with specified content
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="vi">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// A news article page with navigation, an article and a footer
#[allow(dead_code)]
pub fn create_article_html(title: &str, paragraph: &str) -> String {
    create_test_html(
        title,
        &format!(
            r#"<nav><a href="/">Trang chủ</a> <a href="/thoi-su">Thời sự</a></nav>
    <article>
        <h1>{title}</h1>
        <p>{paragraph}</p>
        <p>{paragraph}</p>
    </article>
    <footer>Bản quyền thuộc về tòa soạn</footer>"#
        ),
    )
}

/// Long enough Vietnamese paragraph to pass every content threshold
#[allow(dead_code)]
pub const LONG_PARAGRAPH: &str = "Bão Yagi đổ bộ vào các tỉnh ven biển phía Bắc với sức gió mạnh cấp 12, \
gây mưa lớn trên diện rộng và khiến nhiều khu vực bị ngập sâu. Chính quyền địa phương đã sơ tán \
hàng nghìn hộ dân đến nơi an toàn.";

// =============================================================================
// Mock HTTP helpers
// =============================================================================

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub async fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error status
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}

// =============================================================================
// Fake collaborators
// =============================================================================

type SearchFn = dyn Fn(&str) -> Result<Vec<SearchResult>, SearchError> + Send + Sync;

/// Search provider answering from a closure and recording every query
#[allow(dead_code)]
pub struct FakeSearch {
    respond: Box<SearchFn>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeSearch {
    pub fn new<R>(respond: R) -> Self
    where
        R: Fn(&str) -> Result<Vec<SearchResult>, SearchError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every query returns the same results
    pub fn always(results: Vec<SearchResult>) -> Self {
        Self::new(move |_| Ok(results.clone()))
    }

    /// Every query fails with a quota error
    pub fn quota_exhausted() -> Self {
        Self::new(|_| Err(SearchError::QuotaExceeded("Quota exceeded for quota metric 'Queries'".into())))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.lock().push(query.to_string());
        (self.respond)(query)
    }
}

/// Page fetcher serving canned contents; unknown URLs fail with a network error
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, FetchedContent>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a successful page at `url`
    pub fn with_page(mut self, url: &str, title: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), FetchedContent::extracted(url, title, body));
        self
    }

    /// Serve the same article body for every URL in `urls`
    pub fn serving_all<'a>(urls: impl IntoIterator<Item = &'a str>) -> Self {
        urls.into_iter().fold(Self::new(), |fetcher, url| {
            fetcher.with_page(url, "Bài viết", LONG_PARAGRAPH)
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> FetchedContent {
        self.calls.lock().push(url.to_string());
        self.pages.get(url).cloned().unwrap_or_else(|| {
            FetchedContent::failed(url, FetchFailureKind::Network, "connection refused")
        })
    }
}

/// Which judgment call a prompt went to
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeCall {
    Topics,
    Synthesize,
    Claim,
    Analysis,
}

/// Judgment client with scripted answers and a prompt log
#[allow(dead_code)]
pub struct FakeJudge {
    pub topics: Result<TopicProfile, JudgmentError>,
    pub synthesis: Result<ModelVerdict, JudgmentError>,
    pub claim: Result<ModelVerdict, JudgmentError>,
    pub analysis: Result<EvidenceAnalysis, JudgmentError>,
    pub prompts: Mutex<Vec<(JudgeCall, String)>>,
}

impl Default for FakeJudge {
    fn default() -> Self {
        Self {
            topics: Ok(sample_topic()),
            synthesis: Ok(model_verdict(false, 85)),
            claim: Ok(model_verdict(true, 70)),
            analysis: Err(JudgmentError::Unsupported("evidence analysis")),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[allow(dead_code)]
impl FakeJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as an unavailable model would
    pub fn failing() -> Self {
        let down = JudgmentError::Http {
            status: 503,
            message: "The model is overloaded".into(),
        };
        Self {
            topics: Err(down.clone()),
            synthesis: Err(down.clone()),
            claim: Err(down.clone()),
            analysis: Err(down),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(JudgeCall, String)> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> Vec<JudgeCall> {
        self.prompts.lock().iter().map(|(call, _)| *call).collect()
    }

    fn log(&self, call: JudgeCall, prompt: &str) {
        self.prompts.lock().push((call, prompt.to_string()));
    }
}

impl JudgmentClient for FakeJudge {
    async fn extract_topics(&self, prompt: &str) -> Result<TopicProfile, JudgmentError> {
        self.log(JudgeCall::Topics, prompt);
        self.topics.clone()
    }

    async fn synthesize(&self, prompt: &str) -> Result<ModelVerdict, JudgmentError> {
        self.log(JudgeCall::Synthesize, prompt);
        self.synthesis.clone()
    }

    async fn judge_claim(&self, prompt: &str) -> Result<ModelVerdict, JudgmentError> {
        self.log(JudgeCall::Claim, prompt);
        self.claim.clone()
    }

    async fn analyze_evidence(&self, prompt: &str) -> Result<EvidenceAnalysis, JudgmentError> {
        self.log(JudgeCall::Analysis, prompt);
        self.analysis.clone()
    }
}

// =============================================================================
// Sample data
// =============================================================================

#[allow(dead_code)]
pub fn sample_topic() -> TopicProfile {
    TopicProfile::new(
        "Bão Yagi gây thiệt hại tại miền Bắc",
        vec!["bão Yagi".to_string(), "thiên tai".to_string()],
    )
    .expect("sample topic is valid")
    .with_location("Quảng Ninh")
}

#[allow(dead_code)]
pub fn model_verdict(is_fake: bool, confidence: u8) -> ModelVerdict {
    ModelVerdict {
        is_fake,
        confidence,
        reason: "Nhiều nguồn uy tín xác nhận".to_string(),
        indicators: vec!["nguồn chính thống".to_string()],
        recommendation: "Tham khảo thêm nguồn chính thức".to_string(),
        extra: Map::new(),
    }
}

#[allow(dead_code)]
pub fn result(link: &str) -> SearchResult {
    SearchResult::new(format!("Tiêu đề {link}"), "Đoạn trích", link)
}
