use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::application::{ScheduleStore, TraversalScheduler};
use crate::domain::{ManagerError, Schedule};

/// Tracks which connectors have traversal work scheduled. The set is only
/// ever read from the schedule store, never from the registry.
pub struct InMemoryTraversalScheduler {
    schedule_store: Arc<dyn ScheduleStore>,
    scheduled: RwLock<BTreeMap<String, Schedule>>,
}

impl InMemoryTraversalScheduler {
    pub fn new(schedule_store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            schedule_store,
            scheduled: RwLock::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl TraversalScheduler for InMemoryTraversalScheduler {
    async fn remove_connector(&self, name: &str) {
        if self.scheduled.write().await.remove(name).is_some() {
            debug!("Unscheduled connector {}", name);
        }
    }

    async fn refresh(&self) -> Result<(), ManagerError> {
        let stored = self.schedule_store.list_schedules().await?;

        let mut scheduled = BTreeMap::new();
        for (name, raw) in stored {
            match raw.parse::<Schedule>() {
                Ok(schedule) if schedule.is_for(&name) => {
                    scheduled.insert(name, schedule);
                }
                Ok(schedule) => warn!(
                    "Ignoring schedule {} stored under connector {}",
                    schedule, name
                ),
                Err(e) => warn!("Ignoring unreadable schedule for {}: {}", name, e),
            }
        }

        debug!("Scheduler tracking {} connectors", scheduled.len());
        *self.scheduled.write().await = scheduled;
        Ok(())
    }

    async fn scheduled_connectors(&self) -> Vec<Schedule> {
        self.scheduled.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::InMemoryConnectorStore;

    #[tokio::test]
    async fn test_refresh_skips_corrupt_entries() {
        let store = Arc::new(InMemoryConnectorStore::new());
        store.store_schedule("a", "a:2:0:0-24").await.unwrap();
        store.store_schedule("b", "b:not-a-number").await.unwrap();
        store.store_schedule("c", "a:1:0:0-24").await.unwrap();

        let scheduler = InMemoryTraversalScheduler::new(store);
        scheduler.refresh().await.unwrap();

        let scheduled = scheduler.scheduled_connectors().await;
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].connector_name(), "a");
    }

    #[tokio::test]
    async fn test_remove_unknown_is_noop() {
        let store = Arc::new(InMemoryConnectorStore::new());
        store.store_schedule("a", "a:2:0:0-24").await.unwrap();

        let scheduler = InMemoryTraversalScheduler::new(store);
        scheduler.refresh().await.unwrap();
        scheduler.remove_connector("ghost").await;
        scheduler.remove_connector("a").await;
        scheduler.remove_connector("a").await;

        assert!(scheduler.scheduled_connectors().await.is_empty());
    }
}
