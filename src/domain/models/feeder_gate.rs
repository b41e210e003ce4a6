use serde::{Deserialize, Serialize};

use crate::domain::ManagerError;

/// Location of the appliance endpoint that receives feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederGate {
    host: String,
    port: u16,
}

impl FeederGate {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ManagerError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ManagerError::invalid_argument("feeder gate host is empty"));
        }
        if port == 0 {
            return Err(ManagerError::invalid_argument("feeder gate port must be non-zero"));
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
