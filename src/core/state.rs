//! Per-trigger job state carried across re-firings of one lineage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::schedule::{ActiveScheduleEntity, ScalingParameters, ScheduleAction};

/// Identity of a trigger in the scheduler collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerKey {
    /// Trigger group, usually the application id.
    pub group: String,
    /// Trigger name within the group.
    pub name: String,
}

impl TriggerKey {
    /// Create a key from group and name.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Conventional key for a schedule transition: group = app id,
    /// name = `{schedule_id}_{start|stop}`.
    pub fn for_schedule(app_id: &str, schedule_id: i64, action: ScheduleAction) -> Self {
        Self::new(app_id, format!("{schedule_id}_{}", action.as_str()))
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// Which retry counter a failure is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RescheduleCount {
    /// Persisting or removing the active-schedule record.
    ActiveSchedule,
    /// Notifying the scaling engine.
    ScalingEngineNotification,
}

impl RescheduleCount {
    /// Upper-case name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ActiveSchedule => "ACTIVE_SCHEDULE",
            Self::ScalingEngineNotification => "SCALING_ENGINE_NOTIFICATION",
        }
    }
}

impl fmt::Display for RescheduleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bounded, monotonically increasing retry counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetryCounter(u32);

impl RetryCounter {
    /// Counter starting at `value`.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Current value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether the counter has reached `max`.
    pub const fn is_exhausted(self, max: u32) -> bool {
        self.0 >= max
    }

    /// Counter advanced by one, saturating.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Identifiers and counters for one trigger, owned by a single firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobExecutionState {
    /// Owning application.
    pub app_id: String,
    /// Schedule identifier.
    pub schedule_id: i64,
    /// Transition this trigger applies.
    pub action: ScheduleAction,
    /// Identifier of the start job for this schedule instance.
    pub start_job_identifier: i64,
    /// Bounds sent with the notification.
    pub scaling: ScalingParameters,
    /// Retries charged to the active-schedule phase.
    #[serde(default)]
    pub active_schedule_retry_count: RetryCounter,
    /// Retries charged to the notification phase.
    #[serde(default)]
    pub scaling_engine_notification_retry_count: RetryCounter,
}

impl JobExecutionState {
    /// Fresh state with both counters at zero.
    pub fn new(
        app_id: impl Into<String>,
        schedule_id: i64,
        action: ScheduleAction,
        start_job_identifier: i64,
        scaling: ScalingParameters,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            schedule_id,
            action,
            start_job_identifier,
            scaling,
            active_schedule_retry_count: RetryCounter::default(),
            scaling_engine_notification_retry_count: RetryCounter::default(),
        }
    }

    /// Read the counter of the given kind.
    pub const fn counter(&self, kind: RescheduleCount) -> RetryCounter {
        match kind {
            RescheduleCount::ActiveSchedule => self.active_schedule_retry_count,
            RescheduleCount::ScalingEngineNotification => {
                self.scaling_engine_notification_retry_count
            }
        }
    }

    /// Copy of this state with only the `kind` counter advanced.
    #[must_use]
    pub fn with_incremented(&self, kind: RescheduleCount) -> Self {
        let mut next = self.clone();
        match kind {
            RescheduleCount::ActiveSchedule => {
                next.active_schedule_retry_count = self.active_schedule_retry_count.incremented();
            }
            RescheduleCount::ScalingEngineNotification => {
                next.scaling_engine_notification_retry_count =
                    self.scaling_engine_notification_retry_count.incremented();
            }
        }
        next
    }

    /// Payload for the scaling engine.
    pub fn active_schedule(&self) -> ActiveScheduleEntity {
        ActiveScheduleEntity::new(
            self.app_id.clone(),
            self.schedule_id,
            self.start_job_identifier,
            &self.scaling,
        )
    }
}
