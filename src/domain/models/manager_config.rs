use serde::{Deserialize, Serialize};

use super::FeedType;

/// Process-wide settings handed to each component at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    content_url_prefix: Option<String>,
    default_feed_type: FeedType,
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.content_url_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    pub fn with_default_feed_type(mut self, feed_type: FeedType) -> Self {
        self.default_feed_type = feed_type;
        self
    }

    pub fn content_url_prefix(&self) -> Option<&str> {
        self.content_url_prefix.as_deref()
    }

    pub fn default_feed_type(&self) -> FeedType {
        self.default_feed_type
    }
}
