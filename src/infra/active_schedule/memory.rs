//! In-memory active-schedule store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{ActiveScheduleEntity, ActiveScheduleStore, StoreError};

/// Active schedules keyed by `(app_id, schedule_id)`.
///
/// The store can be switched offline to exercise the retry path of the
/// active-schedule phase.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActiveScheduleStore {
    records: Arc<Mutex<HashMap<(String, i64), ActiveScheduleEntity>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryActiveScheduleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with [`StoreError::Unavailable`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Records for `app_id`, ordered by schedule id.
    pub fn for_app(&self, app_id: &str) -> Vec<ActiveScheduleEntity> {
        let mut out: Vec<_> = self
            .records
            .lock()
            .values()
            .filter(|e| e.app_id == app_id)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.id);
        out
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("active schedule store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ActiveScheduleStore for InMemoryActiveScheduleStore {
    async fn upsert(&self, entity: &ActiveScheduleEntity) -> Result<(), StoreError> {
        self.check_online()?;
        self.records
            .lock()
            .insert((entity.app_id.clone(), entity.id), entity.clone());
        Ok(())
    }

    async fn remove(&self, app_id: &str, schedule_id: i64) -> Result<bool, StoreError> {
        self.check_online()?;
        Ok(self
            .records
            .lock()
            .remove(&(app_id.to_string(), schedule_id))
            .is_some())
    }

    async fn find(
        &self,
        app_id: &str,
        schedule_id: i64,
    ) -> Result<Option<ActiveScheduleEntity>, StoreError> {
        self.check_online()?;
        Ok(self
            .records
            .lock()
            .get(&(app_id.to_string(), schedule_id))
            .cloned())
    }
}
