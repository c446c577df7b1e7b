//! In-memory trigger store with atomic re-arm and per-key firing exclusion.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::core::{JobExecutionState, SchedulerCollaborator, SchedulingError, TriggerKey};

#[derive(Debug, Clone)]
struct TriggerEntry {
    state: JobExecutionState,
    /// `None` once the one-shot fire has been consumed.
    next_fire_at: Option<DateTime<Utc>>,
    in_flight: bool,
}

/// One-shot triggers keyed by [`TriggerKey`].
///
/// Cloning shares the underlying map, so the same store can back both the
/// driver that fires triggers and the executor that re-arms them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTriggerStore {
    triggers: Arc<Mutex<HashMap<TriggerKey, TriggerEntry>>>,
}

impl InMemoryTriggerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a job and arm it at `fire_at`.
    pub fn add_job(&self, key: TriggerKey, state: JobExecutionState, fire_at: DateTime<Utc>) {
        let mut triggers = self.triggers.lock();
        let in_flight = triggers.get(&key).is_some_and(|e| e.in_flight);
        triggers.insert(
            key,
            TriggerEntry {
                state,
                next_fire_at: Some(fire_at),
                in_flight,
            },
        );
    }

    /// Remove a job. Returns whether it existed.
    pub fn remove_job(&self, key: &TriggerKey) -> bool {
        self.triggers.lock().remove(key).is_some()
    }

    /// Stored state for a job.
    pub fn job_state(&self, key: &TriggerKey) -> Option<JobExecutionState> {
        self.triggers.lock().get(key).map(|e| e.state.clone())
    }

    /// When a job next fires, if armed.
    pub fn next_fire_at(&self, key: &TriggerKey) -> Option<DateTime<Utc>> {
        self.triggers.lock().get(key).and_then(|e| e.next_fire_at)
    }

    /// Claim every trigger due at `now` that is not already firing.
    ///
    /// Claimed triggers are disarmed and marked in flight until
    /// [`finish`](Self::finish) is called for them.
    pub fn claim_due(&self, now: DateTime<Utc>) -> Vec<TriggerKey> {
        let mut triggers = self.triggers.lock();
        let mut due: Vec<(DateTime<Utc>, TriggerKey)> = triggers
            .iter_mut()
            .filter(|(_, e)| !e.in_flight && e.next_fire_at.is_some_and(|at| at <= now))
            .map(|(key, e)| {
                e.in_flight = true;
                let at = e.next_fire_at.take().unwrap_or(now);
                (at, key.clone())
            })
            .collect();
        due.sort();
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Mark a firing as finished. A job that was not re-armed during the
    /// firing has reached the end of its lineage and is discarded.
    pub fn finish(&self, key: &TriggerKey) {
        let mut triggers = self.triggers.lock();
        let done = match triggers.get_mut(key) {
            Some(entry) => {
                entry.in_flight = false;
                entry.next_fire_at.is_none()
            }
            None => false,
        };
        if done {
            triggers.remove(key);
        }
    }

    /// Whether a firing of `key` is in progress.
    pub fn is_in_flight(&self, key: &TriggerKey) -> bool {
        self.triggers.lock().get(key).is_some_and(|e| e.in_flight)
    }

    /// Number of stored jobs.
    pub fn len(&self) -> usize {
        self.triggers.lock().len()
    }

    /// Whether no jobs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SchedulerCollaborator for InMemoryTriggerStore {
    async fn get_job_state(&self, key: &TriggerKey) -> Result<JobExecutionState, SchedulingError> {
        self.job_state(key)
            .ok_or_else(|| SchedulingError::TriggerNotFound(key.clone()))
    }

    async fn reschedule(
        &self,
        key: &TriggerKey,
        fire_at: DateTime<Utc>,
        state: JobExecutionState,
    ) -> Result<(), SchedulingError> {
        let mut triggers = self.triggers.lock();
        let entry = triggers
            .get_mut(key)
            .ok_or_else(|| SchedulingError::TriggerNotFound(key.clone()))?;
        entry.state = state;
        entry.next_fire_at = Some(fire_at);
        Ok(())
    }
}
