//! In-memory schedule definition store.

use std::collections::BTreeMap;

use crate::core::{ScheduleDefinition, ScheduleStore, StoreError};

/// Schedule definitions ordered by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleStore {
    schedules: BTreeMap<i64, ScheduleDefinition>,
}

impl InMemoryScheduleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored definitions.
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    /// Whether no definitions are stored.
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn create(&mut self, schedule: ScheduleDefinition) -> Result<(), StoreError> {
        let id = schedule.id();
        if self.schedules.contains_key(&id) {
            return Err(StoreError::Conflict(format!("schedule {id} already exists")));
        }
        self.schedules.insert(id, schedule);
        Ok(())
    }

    fn find_by_id(&self, schedule_id: i64) -> Result<Option<ScheduleDefinition>, StoreError> {
        Ok(self.schedules.get(&schedule_id).cloned())
    }

    fn delete(&mut self, schedule_id: i64) -> Result<bool, StoreError> {
        Ok(self.schedules.remove(&schedule_id).is_some())
    }

    fn find_all_specific_date_schedules_by_app_id(
        &self,
        app_id: &str,
    ) -> Result<Vec<ScheduleDefinition>, StoreError> {
        Ok(self
            .schedules
            .values()
            .filter(|s| s.is_specific_date() && s.app_id() == app_id)
            .cloned()
            .collect())
    }

    fn delete_all_by_app_id(&mut self, app_id: &str) -> Result<usize, StoreError> {
        let before = self.schedules.len();
        self.schedules.retain(|_, s| s.app_id() != app_id);
        Ok(before - self.schedules.len())
    }
}
