use anyhow::Result;

use crate::domain::{DocumentType, SimpleDocument};

use super::super::Container;
use super::parse_assignments;

pub struct ResolveUrlController<'a> {
    container: &'a Container,
}

impl<'a> ResolveUrlController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn resolve(
        &self,
        connector: String,
        properties: Vec<String>,
        acl: bool,
        inherit_from: bool,
    ) -> Result<String> {
        let mut document = SimpleDocument::new();
        for (name, value) in parse_assignments(&properties)? {
            document.add_value(name, value);
        }

        let resolver = self.container.feed_url_resolver(&connector);
        if inherit_from {
            return Ok(resolver
                .get_inherit_from_url(&document)?
                .unwrap_or_else(|| "(no ACL inheritance)".to_string()));
        }

        let document_type = if acl {
            DocumentType::Acl
        } else {
            DocumentType::Record
        };
        Ok(resolver.get_record_url(&document, document_type)?)
    }
}
