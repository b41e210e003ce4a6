use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::application::{HttpClient, SettingsRepository};
use crate::domain::ManagerError;

const USER_AGENT: &str = concat!("connector-manager/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeederGateHealth {
    pub url: String,
    pub status_code: u16,
    pub reachable: bool,
}

/// Probes the configured feeder gate over HTTP.
pub struct CheckFeederGateUseCase {
    settings: Arc<dyn SettingsRepository>,
    http_client: Arc<dyn HttpClient>,
    proxy: Option<String>,
}

impl CheckFeederGateUseCase {
    pub fn new(settings: Arc<dyn SettingsRepository>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            settings,
            http_client,
            proxy: None,
        }
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub async fn execute(&self) -> Result<FeederGateHealth, ManagerError> {
        let gate = self
            .settings
            .feeder_gate()
            .await?
            .ok_or_else(|| ManagerError::invalid_argument("feeder gate is not configured"))?;
        let url = format!("http://{}/xmlfeed", gate.address());

        let mut exchange = self.http_client.get_exchange(&url)?;
        if let Some(proxy) = &self.proxy {
            exchange.set_proxy(proxy)?;
        }
        exchange.set_request_header("User-Agent", USER_AGENT);

        let result = exchange.exchange().await;
        exchange.close();
        let status_code = result?;

        debug!("Feeder gate {} answered {}", url, status_code);
        // The feed endpoint rejects GETs, so any non-5xx answer means it is up.
        let reachable = status_code < 500;
        info!(
            "Feeder gate {} is {}",
            url,
            if reachable { "reachable" } else { "failing" }
        );

        Ok(FeederGateHealth {
            url,
            status_code,
            reachable,
        })
    }
}
