//! URL helpers shared by the search client, the trust ranker and the
//! orchestrator.

use url::Url;

/// Check if a string is an absolute `http`/`https` URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

/// Extract the lower-cased host of a URL, without a leading `www.`
///
/// Accepts bare hosts (`www.bbc.com`) as well as full URLs; returns `None`
/// when nothing host-like can be found.
#[must_use]
pub fn extract_domain(url: &str) -> Option<String> {
    let after_scheme = match url.find("://") {
        Some(scheme_end) => &url[scheme_end + 3..],
        None => url,
    };
    let domain_end = after_scheme
        .find(['/', '?', '#', ':'])
        .unwrap_or(after_scheme.len());
    let domain = after_scheme[..domain_end].trim().to_lowercase();
    let normalized = match domain.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => domain,
    };
    (!normalized.is_empty()).then_some(normalized)
}

/// True when `host` equals `domain` or is a subdomain of it
///
/// `news.bbc.com` matches `bbc.com`; `notbbc.com` does not.
#[must_use]
pub fn host_matches(host: &str, domain: &str) -> bool {
    if host == domain {
        return true;
    }
    host.len() > domain.len()
        && host.ends_with(domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_http_urls_only() {
        assert!(is_valid_url("https://vnexpress.net/bai-viet-123.html"));
        assert!(is_valid_url("  http://example.com  "));
        assert!(!is_valid_url("example.com/path"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("Bão số 3 đổ bộ vào miền Bắc"));
    }

    #[test]
    fn extracts_normalized_domain() {
        assert_eq!(extract_domain("https://www.BBC.com/news"), Some("bbc.com".into()));
        assert_eq!(extract_domain("vi.wikipedia.org"), Some("vi.wikipedia.org".into()));
        assert_eq!(extract_domain("http://host:8080/x"), Some("host".into()));
        assert_eq!(extract_domain(""), None);
    }

    #[test]
    fn host_matching_respects_label_boundaries() {
        assert!(host_matches("bbc.com", "bbc.com"));
        assert!(host_matches("news.bbc.com", "bbc.com"));
        assert!(host_matches("chinhphu.gov.vn", "gov.vn"));
        assert!(!host_matches("notbbc.com", "bbc.com"));
        assert!(!host_matches("bbc.com.evil.io", "bbc.com"));
    }
}
