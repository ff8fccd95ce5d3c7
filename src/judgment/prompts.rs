//! Prompt builders for each judgment call
//!
//! Prompts are written in Vietnamese (the primary audience) and always end
//! with the exact JSON shape expected back.

use std::fmt::Write as _;

use chrono::{Datelike, Utc};

use super::parse::EvidenceAnalysis;
use crate::evidence::{FetchedContent, TopicProfile};
use crate::utils::safe_truncate_chars;

/// Source excerpt length in the topic-extraction prompt
const TOPIC_EXCERPT_CHARS: usize = 1000;
/// Source excerpt length in the final two-phase synthesis prompt
const SYNTHESIS_EXCERPT_CHARS: usize = 800;
/// Source excerpt length in the deep evidence-analysis prompt
const ANALYSIS_EXCERPT_CHARS: usize = 2000;
/// Source excerpt length in the text-claim prompt
const CLAIM_EXCERPT_CHARS: usize = 300;

const VERDICT_SHAPE: &str = r#"{
  "isFakeNews": true/false,
  "confidence": số từ 0 đến 100,
  "reason": "lý do chi tiết",
  "indicators": ["dấu hiệu 1", "dấu hiệu 2"],
  "recommendation": "khuyến nghị cho người đọc"
}"#;

fn period_line() -> String {
    let now = Utc::now();
    format!("Thời điểm hiện tại: tháng {} năm {}.", now.month(), now.year())
}

fn excerpt_block(label: &str, contents: &[&FetchedContent], max_chars: usize) -> String {
    let mut out = String::new();
    for (i, content) in contents.iter().enumerate() {
        let excerpt = safe_truncate_chars(content.body_text(), max_chars);
        let _ = writeln!(
            out,
            "--- {label} {}: {} ---\nTIÊU ĐỀ: {}\nNỘI DUNG: {excerpt}\n",
            i + 1,
            content.source_url(),
            content.title()
        );
    }
    if out.is_empty() {
        out.push_str("(không có)\n");
    }
    out
}

/// Ask for the main title and key topics behind first-phase sources
#[must_use]
pub fn topic_extraction_prompt(original_url: &str, keywords: &str, contents: &[&FetchedContent]) -> String {
    format!(
        r#"Bạn là chuyên gia phân tích nội dung tin tức. {period}

URL GỐC: {original_url}
TỪ KHÓA TỪ URL: {keywords}

CÁC NGUỒN ĐÃ THU THẬP ({count} nguồn):
{sources}
Hãy xác định tiêu đề chính của sự kiện, các chủ đề và từ khóa quan trọng
(xếp theo mức độ liên quan), tóm tắt nội dung cốt lõi, các nhân vật/tổ chức,
địa điểm và loại sự kiện.

Chỉ trả lời bằng JSON:
{{
  "mainTitle": "tiêu đề chính của sự kiện",
  "keyTopics": ["chủ đề 1", "chủ đề 2", "chủ đề 3"],
  "coreContent": "tóm tắt nội dung cốt lõi",
  "mainEntities": ["nhân vật hoặc tổ chức"],
  "eventLocation": "địa điểm",
  "eventType": "chính trị/kinh tế/xã hội/...",
  "urgencyLevel": "high/medium/low"
}}"#,
        period = period_line(),
        count = contents.len(),
        sources = excerpt_block("NGUỒN", contents, TOPIC_EXCERPT_CHARS),
    )
}

/// Final two-phase synthesis over every source and query
#[must_use]
pub fn synthesis_prompt(
    original_url: &str,
    keywords: &str,
    topic: &TopicProfile,
    first: &[&FetchedContent],
    second: &[&FetchedContent],
    queries: &[String],
) -> String {
    let total = first.len() + second.len();
    format!(
        r#"Bạn là chuyên gia kiểm chứng thông tin (fact-checking). {period}

URL CẦN KIỂM CHỨNG: {original_url}

QUY TRÌNH ĐÃ THỰC HIỆN:
1. Tìm kiếm theo từ khóa trong URL: "{keywords}"
2. Thu thập {first_count} nguồn ở vòng 1
3. Xác định tiêu đề chính: "{title}"
4. Tìm kiếm lại theo tiêu đề và chủ đề: {topics}
5. Thu thập thêm {second_count} nguồn ở vòng 2
Các truy vấn đã dùng: {queries}

HỒ SƠ CHỦ ĐỀ:
Tiêu đề chính: {title}
Loại sự kiện: {category}
Địa điểm: {location}
Nội dung cốt lõi: {summary}

NGUỒN VÒNG 1 ({first_count} nguồn):
{first_sources}
NGUỒN VÒNG 2 ({second_count} nguồn):
{second_sources}
Hãy đối chiếu {total} nguồn, đánh giá mức độ nhất quán, chỉ ra mâu thuẫn hoặc
xác nhận, rồi kết luận về nội dung của URL gốc.

Chỉ trả lời bằng JSON:
{{
  "isFakeNews": true/false,
  "confidence": số từ 0 đến 100,
  "reason": "phân tích dựa trên {total} nguồn",
  "indicators": ["dấu hiệu rút ra từ việc đối chiếu"],
  "recommendation": "khuyến nghị cho người đọc",
  "consistencyCheck": "mức độ nhất quán giữa các nguồn",
  "mainTopicVerification": "kết quả xác minh chủ đề chính",
  "sourceDistribution": "phân bố và độ tin cậy của nguồn"
}}"#,
        period = period_line(),
        first_count = first.len(),
        second_count = second.len(),
        title = topic.main_title(),
        topics = topic.key_topics().join(", "),
        category = topic.category(),
        location = topic.location(),
        summary = topic.core_summary(),
        queries = serde_json::to_string(queries).unwrap_or_default(),
        first_sources = excerpt_block("NGUỒN VÒNG 1 -", first, SYNTHESIS_EXCERPT_CHARS),
        second_sources = excerpt_block("NGUỒN VÒNG 2 -", second, SYNTHESIS_EXCERPT_CHARS),
    )
}

/// Preliminary judgment of a URL from its address and keywords alone
#[must_use]
pub fn url_only_prompt(url: &str, keywords: &str) -> String {
    format!(
        r#"Bạn là chuyên gia kiểm chứng thông tin. {period}
Không có kết quả tìm kiếm web; chỉ đánh giá sơ bộ dựa trên URL và từ khóa.

URL: {url}
TỪ KHÓA: {keywords}

Hãy đánh giá tên miền và độ tin cậy của nguồn, chủ đề suy ra từ từ khóa,
và cách người đọc có thể tự kiểm tra thêm.

Chỉ trả lời bằng JSON:
{{
  "isFakeNews": true/false,
  "confidence": số từ 0 đến 100,
  "reason": "phân tích dựa trên tên miền và từ khóa",
  "indicators": ["dấu hiệu từ URL và từ khóa"],
  "recommendation": "cách kiểm tra thêm",
  "domainAnalysis": "đánh giá về tên miền",
  "topicAnalysis": "phân tích chủ đề từ từ khóa"
}}"#,
        period = period_line(),
    )
}

/// Deep reading of full source texts against a claim
#[must_use]
pub fn evidence_analysis_prompt(claim: &str, contents: &[&FetchedContent]) -> String {
    format!(
        r#"Bạn là chuyên gia phân tích thông tin. {period}

TUYÊN BỐ CẦN KIỂM TRA: "{claim}"

NỘI DUNG CHI TIẾT TỪ CÁC NGUỒN:
{sources}
Đọc kỹ toàn bộ nội dung, xác định bằng chứng ủng hộ và phản bác (kèm trích
dẫn cụ thể), yếu tố ngữ cảnh về thời gian và địa điểm, và so sánh các nguồn.

Chỉ trả lời bằng JSON:
{{
  "detailedAnalysis": "phân tích chi tiết",
  "supportingEvidence": ["bằng chứng ủng hộ kèm trích dẫn"],
  "contradictingEvidence": ["bằng chứng phản bác kèm trích dẫn"],
  "contextualFactors": ["yếu tố ngữ cảnh"],
  "crossReferenceFindings": "kết quả đối chiếu giữa các nguồn",
  "contentBasedConclusion": "kết luận dựa trên nội dung"
}}"#,
        period = period_line(),
        sources = excerpt_block("NGUỒN", contents, ANALYSIS_EXCERPT_CHARS),
    )
}

/// Judgment of a text claim backed by fetched evidence
#[must_use]
pub fn claim_with_evidence_prompt(
    claim: &str,
    contents: &[&FetchedContent],
    analysis: Option<&EvidenceAnalysis>,
) -> String {
    let mut summary = String::new();
    for content in contents {
        let _ = writeln!(
            summary,
            "• {}: {}...",
            content.source_url(),
            safe_truncate_chars(content.body_text(), CLAIM_EXCERPT_CHARS)
        );
    }
    let analysis_text = analysis
        .and_then(|a| serde_json::to_string_pretty(a).ok())
        .unwrap_or_else(|| "Không có phân tích chi tiết".to_string());

    format!(
        r#"Bạn là chuyên gia phân tích tin tức, biết tổng hợp thông tin từ nhiều nguồn. {period}

TUYÊN BỐ CẦN PHÂN TÍCH: "{claim}"

BẰNG CHỨNG TỪ WEB ({count} nguồn):
{summary}
KẾT QUẢ PHÂN TÍCH SÂU:
{analysis_text}

Hãy xác định tuyên bố có phải tin giả không, mức độ tin cậy, lý do dựa trên
bằng chứng web và các dấu hiệu nhận biết.

Chỉ trả lời bằng JSON:
{VERDICT_SHAPE}"#,
        period = period_line(),
        count = contents.len(),
    )
}

/// Judgment of a text claim with no web evidence
#[must_use]
pub fn claim_only_prompt(claim: &str) -> String {
    format!(
        r#"Bạn là chuyên gia phân tích tin tức. {period}

VĂN BẢN CẦN PHÂN TÍCH: "{claim}"

Hãy xác định đây có phải tin giả không, mức độ tin cậy, lý do và các dấu hiệu
nhận biết.

Chỉ trả lời bằng JSON:
{VERDICT_SHAPE}"#,
        period = period_line(),
    )
}
