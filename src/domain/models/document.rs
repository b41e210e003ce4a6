use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ManagerError;

/// Well-known document property names.
pub mod property {
    pub const SEARCH_URL: &str = "google:searchurl";
    pub const DOCID: &str = "google:docid";
    pub const FEED_TYPE: &str = "google:feedtype";
    pub const ACL_INHERIT_FROM: &str = "google:aclinheritfrom";
    pub const ACL_INHERIT_FROM_DOCID: &str = "google:aclinheritfrom:docid";
    pub const ACL_INHERIT_FROM_FEEDTYPE: &str = "google:aclinheritfrom:feedtype";
}

/// Addressing policy applied when fabricating a document URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    Web,
    #[default]
    Content,
    ContentUrl,
}

impl FeedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedType::Web => "web",
            FeedType::Content => "content",
            FeedType::ContentUrl => "contenturl",
        }
    }

    /// Case-insensitive lookup; `None` for unrecognised values.
    pub fn find(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "web" => Some(FeedType::Web),
            "content" => Some(FeedType::Content),
            "contenturl" => Some(FeedType::ContentUrl),
            _ => None,
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| format!("unknown feed type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Record,
    /// ACL pseudo-documents may use non-HTTP addressing schemes.
    Acl,
}

impl DocumentType {
    pub fn is_acl(&self) -> bool {
        matches!(self, DocumentType::Acl)
    }
}

/// Connector-populated property bag.
///
/// Reading a property may reach back into the content source, so lookups
/// are fallible.
pub trait Document: Send + Sync {
    fn property_values(&self, name: &str) -> Result<Option<Vec<String>>, ManagerError>;

    fn property_names(&self) -> Result<Vec<String>, ManagerError>;

    /// First value of `name`, treating missing and empty values alike.
    fn optional_string(&self, name: &str) -> Result<Option<String>, ManagerError> {
        Ok(self
            .property_values(name)?
            .and_then(|values| values.into_iter().next())
            .filter(|value| !value.is_empty()))
    }
}

/// In-memory document built from literal property values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleDocument {
    properties: BTreeMap<String, Vec<String>>,
}

impl SimpleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_value(name, value);
        self
    }

    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Document for SimpleDocument {
    fn property_values(&self, name: &str) -> Result<Option<Vec<String>>, ManagerError> {
        Ok(self.properties.get(name).cloned())
    }

    fn property_names(&self) -> Result<Vec<String>, ManagerError> {
        Ok(self.properties.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_type_lookup_is_case_insensitive() {
        assert_eq!(FeedType::find("WEB"), Some(FeedType::Web));
        assert_eq!(FeedType::find("ContentUrl"), Some(FeedType::ContentUrl));
        assert_eq!(FeedType::find(" content "), Some(FeedType::Content));
        assert_eq!(FeedType::find("metadata"), None);
    }

    #[test]
    fn test_optional_string_skips_empty_values() {
        let doc = SimpleDocument::new()
            .with_property(property::DOCID, "")
            .with_property(property::SEARCH_URL, "http://example/doc1")
            .with_property(property::SEARCH_URL, "http://example/doc2");

        assert_eq!(doc.optional_string(property::DOCID).unwrap(), None);
        assert_eq!(
            doc.optional_string(property::SEARCH_URL).unwrap().as_deref(),
            Some("http://example/doc1")
        );
        assert_eq!(doc.optional_string("missing").unwrap(), None);
        assert_eq!(doc.len(), 2);
    }
}
