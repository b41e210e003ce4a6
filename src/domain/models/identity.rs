use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationIdentity {
    username: String,
    #[serde(skip_serializing)]
    password: Option<String>,
    domain: Option<String>,
}

impl AuthenticationIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
            domain: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    valid: bool,
    data: Option<String>,
}

impl AuthenticationResponse {
    pub fn new(valid: bool, data: Option<String>) -> Self {
        Self { valid, data }
    }

    pub fn invalid() -> Self {
        Self::new(false, None)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    docid: String,
    valid: bool,
}

impl AuthorizationResponse {
    pub fn new(docid: impl Into<String>, valid: bool) -> Self {
        Self {
            docid: docid.into(),
            valid,
        }
    }

    pub fn docid(&self) -> &str {
        &self.docid
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn into_docid(self) -> String {
        self.docid
    }
}
