//! Interfaces the executor consumes but does not own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::{SchedulingError, StoreError};
use crate::core::schedule::{ActiveScheduleEntity, ScheduleDefinition};
use crate::core::state::{JobExecutionState, TriggerKey};

/// Trigger scheduler that fires jobs and re-arms them on request.
///
/// Implementations must not fire a key again while a firing of the same key
/// is in progress, and must serialize `reschedule` calls per key.
#[async_trait]
pub trait SchedulerCollaborator: Send + Sync {
    /// Current identifiers and counters for the firing trigger.
    async fn get_job_state(&self, key: &TriggerKey) -> Result<JobExecutionState, SchedulingError>;

    /// Persist `state` and arm a one-shot fire at `fire_at` as one step.
    async fn reschedule(
        &self,
        key: &TriggerKey,
        fire_at: DateTime<Utc>,
        state: JobExecutionState,
    ) -> Result<(), SchedulingError>;
}

/// Store of schedule instances currently in effect.
#[async_trait]
pub trait ActiveScheduleStore: Send + Sync {
    /// Insert or replace the record for `(app_id, id)`.
    async fn upsert(&self, entity: &ActiveScheduleEntity) -> Result<(), StoreError>;

    /// Remove the record. Returns whether one existed.
    async fn remove(&self, app_id: &str, schedule_id: i64) -> Result<bool, StoreError>;

    /// Look up the record for `(app_id, schedule_id)`.
    async fn find(
        &self,
        app_id: &str,
        schedule_id: i64,
    ) -> Result<Option<ActiveScheduleEntity>, StoreError>;
}

/// Persistence of authored schedule definitions.
pub trait ScheduleStore {
    /// Store a new definition. Fails with `Conflict` if the id exists.
    fn create(&mut self, schedule: ScheduleDefinition) -> Result<(), StoreError>;
    /// Definition by id.
    fn find_by_id(&self, schedule_id: i64) -> Result<Option<ScheduleDefinition>, StoreError>;
    /// Remove a definition. Returns whether one existed.
    fn delete(&mut self, schedule_id: i64) -> Result<bool, StoreError>;
    /// All specific-date schedules owned by `app_id`, ordered by id.
    fn find_all_specific_date_schedules_by_app_id(
        &self,
        app_id: &str,
    ) -> Result<Vec<ScheduleDefinition>, StoreError>;
    /// Remove every schedule owned by `app_id`. Returns how many were removed.
    fn delete_all_by_app_id(&mut self, app_id: &str) -> Result<usize, StoreError>;
}
