use async_trait::async_trait;

use crate::domain::{ManagerError, Schedule};

/// Runs traversal work for scheduled connectors. It does not watch the
/// registry, so topology changes must be pushed to it.
#[async_trait]
pub trait TraversalScheduler: Send + Sync {
    /// Stops scheduling `name`. A no-op for names it does not track.
    async fn remove_connector(&self, name: &str);

    /// Reloads the scheduled set from the persisted schedules.
    async fn refresh(&self) -> Result<(), ManagerError>;

    async fn scheduled_connectors(&self) -> Vec<Schedule>;
}
