//! Readable text extraction from HTML documents.
//!
//! Text is gathered by walking the DOM iteratively (no recursion, so deeply
//! nested markup cannot overflow the stack) while skipping every subtree in a
//! precomputed removal set.

use std::collections::HashSet;

use ego_tree::NodeId;
use ego_tree::iter::Edge;
use log::{debug, warn};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use super::selectors::{BLOCK_ELEMENTS, BODY, H1, MAIN_CONTENT, REMOVE, TITLE};
use crate::utils::{MAX_PAGE_BYTES, MIN_BODY_CHARS, MIN_MAIN_CONTENT_CHARS, char_len};

/// Collect the ids of every element that must not contribute text
pub(super) fn removal_set(document: &Html) -> HashSet<NodeId> {
    let mut to_remove = HashSet::new();
    for selector in REMOVE.iter() {
        for element in document.select(selector) {
            to_remove.insert(element.id());
        }
    }
    to_remove
}

/// Raw text of `element`, one line per block boundary
pub(super) fn element_text(element: ElementRef<'_>, to_remove: &HashSet<NodeId>) -> String {
    let mut out = String::new();
    let mut skipping: Option<NodeId> = None;

    for edge in element.traverse() {
        match edge {
            Edge::Open(node) => {
                if skipping.is_some() {
                    continue;
                }
                if to_remove.contains(&node.id()) {
                    skipping = Some(node.id());
                    continue;
                }
                match node.value() {
                    Node::Text(text) => out.push_str(text),
                    Node::Element(el) if is_block(el.name()) => out.push('\n'),
                    _ => {}
                }
            }
            Edge::Close(node) => {
                if let Some(id) = skipping {
                    if id == node.id() {
                        skipping = None;
                    }
                    continue;
                }
                if let Node::Element(el) = node.value()
                    && is_block(el.name())
                {
                    out.push('\n');
                }
            }
        }
    }
    out
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

/// Normalise extracted text
///
/// Spaces and tabs collapse to one space, each line is trimmed, empty lines
/// disappear and a line identical to an earlier one is dropped.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = Vec::new();

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            continue;
        }
        if seen.insert(collapsed.clone()) {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}

/// Body text of a parsed document
pub(super) fn body_from_document(document: &Html) -> String {
    let to_remove = removal_set(document);

    for (priority, selector) in MAIN_CONTENT.iter().enumerate() {
        let mut combined = String::new();
        for element in document.select(selector) {
            combined.push_str(&element_text(element, &to_remove));
            combined.push('\n');
        }
        let text = normalize_text(&combined);
        if char_len(&text) > MIN_MAIN_CONTENT_CHARS {
            debug!("main content matched selector #{priority} ({} chars)", char_len(&text));
            return text;
        }
    }

    let body_text = document
        .select(&BODY)
        .next()
        .map(|body| normalize_text(&element_text(body, &to_remove)))
        .unwrap_or_default();
    if char_len(&body_text) >= MIN_BODY_CHARS {
        return body_text;
    }

    let whole = normalize_text(&element_text(document.root_element(), &to_remove));
    if char_len(&whole) > char_len(&body_text) {
        whole
    } else {
        body_text
    }
}

/// Title of a parsed document: `<title>`, else the first `<h1>`
pub(super) fn title_from_document(document: &Html) -> String {
    let first_text = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty())
    };
    first_text(&TITLE).or_else(|| first_text(&H1)).unwrap_or_default()
}

pub(super) fn within_size_limit(html: &str) -> bool {
    if html.len() > MAX_PAGE_BYTES {
        warn!(
            "HTML input too large: {} bytes (max: {} bytes); extraction skipped",
            html.len(),
            MAX_PAGE_BYTES
        );
        return false;
    }
    true
}

/// Extract the readable body text of an HTML document
///
/// Never fails: malformed markup is parsed leniently and oversized input
/// yields an empty string.
#[must_use]
pub fn extract_body(html: &str) -> String {
    if html.trim().is_empty() || !within_size_limit(html) {
        return String::new();
    }
    body_from_document(&Html::parse_document(html))
}

/// Extract the document title (`<title>`, else first `<h1>`, else empty)
#[must_use]
pub fn extract_title(html: &str) -> String {
    if html.trim().is_empty() || !within_size_limit(html) {
        return String::new();
    }
    title_from_document(&Html::parse_document(html))
}
