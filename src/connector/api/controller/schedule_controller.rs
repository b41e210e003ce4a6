use anyhow::Result;

use crate::application::TraversalScheduler;

use super::super::Container;

pub struct ScheduleController<'a> {
    container: &'a Container,
}

impl<'a> ScheduleController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn schedule(
        &self,
        name: String,
        load: u32,
        retry_delay_millis: u64,
        intervals: String,
    ) -> Result<String> {
        self.container
            .orchestrator()
            .set_schedule(&name, load, retry_delay_millis, &intervals)
            .await?;

        let scheduled = self.container.scheduler().scheduled_connectors().await;

        let schedule = scheduled
            .iter()
            .find(|s| s.is_for(&name))
            .map(|s| s.to_string())
            .unwrap_or_default();
        Ok(format!("Connector {} scheduled: {}", name, schedule))
    }
}
