use tracing::warn;
use url::Url;

use crate::domain::{property, Document, DocumentType, FeedType, ManagerConfig, ManagerError};

pub const CONNECTOR_URL_PROTOCOL: &str = "googleconnector://";
pub const CONNECTOR_URL_DOCID_MARKER: &str = "/doc?docid=";
pub const CONNECTOR_NAME_PARAM: &str = "connector-name";
pub const DOCID_PARAM: &str = "docid";

/// Schemes the appliance accepts for explicit document URLs.
const ACCEPTED_SCHEMES: &[&str] = &["http", "https", "ftp", "file", "jar", "mailto", "smb"];

/// Resolves the URL under which a document, or the ACL it inherits from, is
/// registered with the search appliance.
///
/// Immutable after construction and safe to share between feed producers.
#[derive(Debug, Clone)]
pub struct FeedUrlResolver {
    data_source: String,
    default_feed_type: FeedType,
    content_url_prefix: Option<String>,
}

impl FeedUrlResolver {
    pub fn new(
        data_source: impl Into<String>,
        default_feed_type: FeedType,
        content_url_prefix: Option<String>,
    ) -> Self {
        Self {
            data_source: data_source.into(),
            default_feed_type,
            content_url_prefix: content_url_prefix.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_config(data_source: impl Into<String>, config: &ManagerConfig) -> Self {
        Self::new(
            data_source,
            config.default_feed_type(),
            config.content_url_prefix().map(str::to_string),
        )
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn default_feed_type(&self) -> FeedType {
        self.default_feed_type
    }

    /// Fails with `MissingAddressingProperty` when the document has neither a
    /// search URL nor a docid.
    pub fn get_record_url(
        &self,
        document: &dyn Document,
        document_type: DocumentType,
    ) -> Result<String, ManagerError> {
        self.resolve(
            document,
            property::SEARCH_URL,
            property::DOCID,
            self.default_feed_type,
            document_type,
        )?
        .ok_or_else(|| ManagerError::MissingAddressingProperty {
            url_property: property::SEARCH_URL.to_string(),
            docid_property: property::DOCID.to_string(),
        })
    }

    /// `Ok(None)` when the document does not inherit its ACL.
    pub fn get_inherit_from_url(
        &self,
        document: &dyn Document,
    ) -> Result<Option<String>, ManagerError> {
        let feed_type = self.inherit_from_feed_type(document)?;
        self.resolve(
            document,
            property::ACL_INHERIT_FROM,
            property::ACL_INHERIT_FROM_DOCID,
            feed_type,
            DocumentType::Acl,
        )
    }

    /// Inherit-from feed type, then the document feed type, then the default.
    fn inherit_from_feed_type(&self, document: &dyn Document) -> Result<FeedType, ManagerError> {
        let declared = match document.optional_string(property::ACL_INHERIT_FROM_FEEDTYPE)? {
            Some(value) => Some(value),
            None => document.optional_string(property::FEED_TYPE)?,
        };

        Ok(match declared {
            None => self.default_feed_type,
            Some(value) => FeedType::find(&value).unwrap_or_else(|| {
                warn!(
                    "Unknown feed type '{}' on document, using {}",
                    value, self.default_feed_type
                );
                self.default_feed_type
            }),
        })
    }

    /// Explicit URL from `url_property` if present, otherwise a URL
    /// fabricated from `docid_property` according to `feed_type`.
    pub fn resolve(
        &self,
        document: &dyn Document,
        url_property: &str,
        docid_property: &str,
        feed_type: FeedType,
        document_type: DocumentType,
    ) -> Result<Option<String>, ManagerError> {
        if let Some(url) = document.optional_string(url_property)? {
            if !document_type.is_acl() {
                validate_url(&url, url_property)?;
            }
            return Ok(Some(url));
        }

        match document.optional_string(docid_property)? {
            Some(docid) => self.construct_url(&docid, feed_type).map(Some),
            None => Ok(None),
        }
    }

    fn construct_url(&self, docid: &str, feed_type: FeedType) -> Result<String, ManagerError> {
        match feed_type {
            FeedType::Web => Ok(docid.to_string()),
            FeedType::Content => Ok(self.connector_url(docid)),
            FeedType::ContentUrl => self.content_url(docid),
        }
    }

    fn connector_url(&self, docid: &str) -> String {
        format!(
            "{}{}.localhost{}{}",
            CONNECTOR_URL_PROTOCOL, self.data_source, CONNECTOR_URL_DOCID_MARKER, docid
        )
    }

    fn content_url(&self, docid: &str) -> Result<String, ManagerError> {
        let prefix = self.content_url_prefix.as_deref().ok_or_else(|| {
            ManagerError::illegal_state("content URL prefix must not be null or empty")
        })?;

        let mut url = String::from(prefix);
        append_query_param(&mut url, CONNECTOR_NAME_PARAM, &self.data_source);
        append_query_param(&mut url, DOCID_PARAM, docid);
        Ok(url)
    }
}

/// Appends `name=value` to `buf`, starting the query string if needed.
/// The value is form-urlencoded.
pub fn append_query_param(buf: &mut String, name: &str, value: &str) {
    buf.push(if buf.contains('?') { '&' } else { '?' });
    buf.push_str(name);
    buf.push('=');
    buf.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
}

fn validate_url(url: &str, property: &str) -> Result<(), ManagerError> {
    let parsed =
        Url::parse(url).map_err(|e| ManagerError::malformed_url(property, url, e.to_string()))?;

    if !ACCEPTED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ManagerError::malformed_url(
            property,
            url,
            format!("unknown protocol: {}", parsed.scheme()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SimpleDocument;

    fn resolver(feed_type: FeedType) -> FeedUrlResolver {
        FeedUrlResolver::new("ds1", feed_type, Some("http://cm:8080/getDocumentContent".into()))
    }

    #[test]
    fn test_search_url_returned_unchanged() {
        let doc = SimpleDocument::new()
            .with_property(property::SEARCH_URL, "http://example/doc1")
            .with_property(property::DOCID, "42");

        let url = resolver(FeedType::Content)
            .get_record_url(&doc, DocumentType::Record)
            .unwrap();
        assert_eq!(url, "http://example/doc1");
    }

    #[test]
    fn test_smb_search_url_is_valid() {
        let doc = SimpleDocument::new().with_property(property::SEARCH_URL, "smb://host/share/a.doc");

        let url = resolver(FeedType::Web)
            .get_record_url(&doc, DocumentType::Record)
            .unwrap();
        assert_eq!(url, "smb://host/share/a.doc");
    }

    #[test]
    fn test_mailto_search_url_is_valid() {
        let doc = SimpleDocument::new().with_property(property::SEARCH_URL, "mailto:ops@example.com");

        let url = resolver(FeedType::Web)
            .get_record_url(&doc, DocumentType::Record)
            .unwrap();
        assert_eq!(url, "mailto:ops@example.com");
    }

    #[test]
    fn test_malformed_search_url() {
        for bad in ["not a url", "gopherish://x/y", "/relative/path"] {
            let doc = SimpleDocument::new().with_property(property::SEARCH_URL, bad);
            let err = resolver(FeedType::Web)
                .get_record_url(&doc, DocumentType::Record)
                .unwrap_err();
            assert!(
                matches!(err, ManagerError::MalformedDocumentUrl { .. }),
                "{} should be malformed",
                bad
            );
        }
    }

    #[test]
    fn test_acl_document_skips_validation() {
        let doc = SimpleDocument::new().with_property(property::SEARCH_URL, "not a url");

        let url = resolver(FeedType::Web)
            .get_record_url(&doc, DocumentType::Acl)
            .unwrap();
        assert_eq!(url, "not a url");
    }

    #[test]
    fn test_web_docid_is_the_url() {
        let doc = SimpleDocument::new().with_property(property::DOCID, "42");

        let url = resolver(FeedType::Web)
            .get_record_url(&doc, DocumentType::Record)
            .unwrap();
        assert_eq!(url, "42");
    }

    #[test]
    fn test_content_docid_builds_connector_url() {
        let doc = SimpleDocument::new().with_property(property::DOCID, "42");

        let url = resolver(FeedType::Content)
            .get_record_url(&doc, DocumentType::Record)
            .unwrap();
        assert_eq!(url, "googleconnector://ds1.localhost/doc?docid=42");
    }

    #[test]
    fn test_contenturl_docid_encodes_parameters() {
        let doc = SimpleDocument::new().with_property(property::DOCID, "a b&c");

        let url = resolver(FeedType::ContentUrl)
            .get_record_url(&doc, DocumentType::Record)
            .unwrap();
        assert_eq!(
            url,
            "http://cm:8080/getDocumentContent?connector-name=ds1&docid=a+b%26c"
        );
    }

    #[test]
    fn test_contenturl_without_prefix_is_illegal_state() {
        let doc = SimpleDocument::new().with_property(property::DOCID, "42");
        let resolver = FeedUrlResolver::new("ds1", FeedType::ContentUrl, None);

        let err = resolver.get_record_url(&doc, DocumentType::Record).unwrap_err();
        assert!(err.is_illegal_state());

        let empty_prefix = FeedUrlResolver::new("ds1", FeedType::ContentUrl, Some(String::new()));
        assert!(empty_prefix
            .get_record_url(&doc, DocumentType::Record)
            .unwrap_err()
            .is_illegal_state());
    }

    #[test]
    fn test_missing_addressing_property() {
        let doc = SimpleDocument::new().with_property("title", "hello");

        let err = resolver(FeedType::Web)
            .get_record_url(&doc, DocumentType::Record)
            .unwrap_err();
        assert!(matches!(err, ManagerError::MissingAddressingProperty { .. }));
    }

    #[test]
    fn test_inherit_from_url_is_not_validated() {
        let doc = SimpleDocument::new().with_property(property::ACL_INHERIT_FROM, "smb://host/share");

        let url = resolver(FeedType::Web).get_inherit_from_url(&doc).unwrap();
        assert_eq!(url.as_deref(), Some("smb://host/share"));
    }

    #[test]
    fn test_no_inheritance_is_none() {
        let doc = SimpleDocument::new().with_property(property::DOCID, "42");

        assert_eq!(resolver(FeedType::Web).get_inherit_from_url(&doc).unwrap(), None);
    }

    #[test]
    fn test_inherit_from_feed_type_precedence() {
        let doc = SimpleDocument::new()
            .with_property(property::ACL_INHERIT_FROM_DOCID, "parent")
            .with_property(property::ACL_INHERIT_FROM_FEEDTYPE, "web")
            .with_property(property::FEED_TYPE, "content");

        let url = resolver(FeedType::ContentUrl).get_inherit_from_url(&doc).unwrap();
        assert_eq!(url.as_deref(), Some("parent"));
    }

    #[test]
    fn test_inherit_from_falls_back_to_document_feed_type() {
        let doc = SimpleDocument::new()
            .with_property(property::ACL_INHERIT_FROM_DOCID, "parent")
            .with_property(property::FEED_TYPE, "CONTENT");

        let url = resolver(FeedType::Web).get_inherit_from_url(&doc).unwrap();
        assert_eq!(
            url.as_deref(),
            Some("googleconnector://ds1.localhost/doc?docid=parent")
        );
    }

    #[test]
    fn test_inherit_from_falls_back_to_default_feed_type() {
        let doc = SimpleDocument::new()
            .with_property(property::ACL_INHERIT_FROM_DOCID, "parent")
            .with_property(property::ACL_INHERIT_FROM_FEEDTYPE, "bogus");

        let url = resolver(FeedType::Web).get_inherit_from_url(&doc).unwrap();
        assert_eq!(url.as_deref(), Some("parent"));
    }

    #[test]
    fn test_append_query_param() {
        let mut url = "http://host/path".to_string();
        append_query_param(&mut url, "a", "1");
        append_query_param(&mut url, "b", "x/y");
        assert_eq!(url, "http://host/path?a=1&b=x%2Fy");
    }
}
