use anyhow::Result;

use super::super::Container;

pub struct FeederGateController<'a> {
    container: &'a Container,
}

impl<'a> FeederGateController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn set(&self, host: String, port: u16) -> Result<String> {
        let orchestrator = self.container.orchestrator();
        orchestrator.set_connector_manager_config(&host, port).await?;

        let address = orchestrator
            .get_connector_manager_config()
            .await?
            .map(|gate| gate.address())
            .unwrap_or_default();
        Ok(format!("Feeder gate set to {}.", address))
    }

    pub async fn check(&self, proxy: Option<String>) -> Result<String> {
        let health = self
            .container
            .check_feeder_gate_use_case(proxy)
            .execute()
            .await?;

        Ok(format!(
            "Feeder gate {}: HTTP {} ({})",
            health.url,
            health.status_code,
            if health.reachable { "reachable" } else { "failing" }
        ))
    }
}
