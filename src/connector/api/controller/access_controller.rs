use anyhow::Result;

use crate::domain::AuthenticationIdentity;

use super::super::Container;

pub struct AccessController<'a> {
    container: &'a Container,
}

impl<'a> AccessController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn authenticate(
        &self,
        name: String,
        username: String,
        password: Option<String>,
        domain: Option<String>,
    ) -> Result<String> {
        let mut identity = AuthenticationIdentity::new(&username);
        if let Some(password) = password {
            identity = identity.with_password(password);
        }
        if let Some(domain) = domain {
            identity = identity.with_domain(domain);
        }

        let valid = self
            .container
            .orchestrator()
            .authenticate(&name, &identity)
            .await;

        Ok(format!(
            "User {} {} by connector {}.",
            username,
            if valid { "authenticated" } else { "not authenticated" },
            name
        ))
    }

    pub async fn authorize(
        &self,
        name: String,
        username: String,
        docids: Vec<String>,
    ) -> Result<String> {
        let authorized = self
            .container
            .orchestrator()
            .authorize_documents(&name, &docids, &username)
            .await;

        if authorized.is_empty() {
            return Ok(format!("No documents authorized for {}.", username));
        }

        // Keep the order the ids were requested in.
        let mut output = String::new();
        for docid in docids.iter().filter(|id| authorized.contains(*id)) {
            output.push_str(docid);
            output.push('\n');
        }
        Ok(output)
    }
}
