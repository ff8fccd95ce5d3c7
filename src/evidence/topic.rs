//! Topic profile identified from first-phase evidence

use std::collections::HashSet;

use serde::Serialize;

/// What the first-phase sources are about
///
/// Immutable once built: there are no setters, only consuming `with_*`
/// builders used while assembling it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProfile {
    main_title: String,
    key_topics: Vec<String>,
    core_summary: String,
    entities: Vec<String>,
    location: String,
    category: String,
    urgency: String,
}

fn dedupe_in_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

impl TopicProfile {
    /// Build a profile, or `None` when it is unusable
    ///
    /// A profile needs a non-blank title and at least one non-blank topic.
    /// Topics keep their relevance order; repeats (case-insensitive) are dropped.
    #[must_use]
    pub fn new(main_title: impl Into<String>, key_topics: impl IntoIterator<Item = String>) -> Option<Self> {
        let main_title = main_title.into().split_whitespace().collect::<Vec<_>>().join(" ");
        let key_topics = dedupe_in_order(key_topics);
        if main_title.is_empty() || key_topics.is_empty() {
            return None;
        }
        Some(Self {
            main_title,
            key_topics,
            core_summary: String::new(),
            entities: Vec::new(),
            location: String::new(),
            category: String::new(),
            urgency: String::new(),
        })
    }

    #[must_use]
    pub fn with_core_summary(mut self, summary: impl Into<String>) -> Self {
        self.core_summary = summary.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn with_entities(mut self, entities: impl IntoIterator<Item = String>) -> Self {
        self.entities = dedupe_in_order(entities);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn with_urgency(mut self, urgency: impl Into<String>) -> Self {
        self.urgency = urgency.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn main_title(&self) -> &str {
        &self.main_title
    }

    #[must_use]
    pub fn key_topics(&self) -> &[String] {
        &self.key_topics
    }

    /// Topics joined by single spaces, as used in search queries
    #[must_use]
    pub fn joined_topics(&self) -> String {
        self.key_topics.join(" ")
    }

    #[must_use]
    pub fn core_summary(&self) -> &str {
        &self.core_summary
    }

    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn urgency(&self) -> &str {
        &self.urgency
    }
}
