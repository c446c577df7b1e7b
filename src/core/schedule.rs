//! Schedule records: authored definitions and the active-schedule payload
//! exchanged with the scaling engine.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Transition a firing applies to a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleAction {
    /// The schedule becomes active.
    Start,
    /// The schedule stops being active.
    Stop,
}

impl ScheduleAction {
    /// Lowercase label used in logs and audit payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ScheduleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "START",
            Self::Stop => "STOP",
        })
    }
}

/// Instance bounds a schedule applies while active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingParameters {
    /// Lower instance bound.
    pub instance_min_count: u32,
    /// Upper instance bound.
    pub instance_max_count: u32,
    /// Instance floor applied only when the schedule starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_min_instance_count: Option<u32>,
}

/// One schedule instance currently in effect, as sent to the scaling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveScheduleEntity {
    /// Schedule identifier.
    pub id: i64,
    /// Owning application.
    pub app_id: String,
    /// Identifier of the start job that produced this record.
    pub start_job_identifier: i64,
    /// Lower instance bound.
    pub instance_min_count: u32,
    /// Upper instance bound.
    pub instance_max_count: u32,
    /// Instance floor applied when the schedule starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_min_instance_count: Option<u32>,
}

impl ActiveScheduleEntity {
    /// Build the payload for `app_id`/`schedule_id` from its scaling parameters.
    pub fn new(
        app_id: impl Into<String>,
        schedule_id: i64,
        start_job_identifier: i64,
        scaling: &ScalingParameters,
    ) -> Self {
        Self {
            id: schedule_id,
            app_id: app_id.into(),
            start_job_identifier,
            instance_min_count: scaling.instance_min_count,
            instance_max_count: scaling.instance_max_count,
            initial_min_instance_count: scaling.initial_min_instance_count,
        }
    }
}

/// Days a recurring schedule applies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceDays {
    /// ISO weekdays, 1 = Monday .. 7 = Sunday.
    DaysOfWeek(Vec<u8>),
    /// Days of the month, 1..=31.
    DaysOfMonth(Vec<u8>),
}

/// Authored schedule, either for a specific date range or recurring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleDefinition {
    /// Active between two absolute instants.
    SpecificDate {
        /// Schedule identifier.
        id: i64,
        /// Owning application.
        app_id: String,
        /// IANA timezone name the schedule was authored in.
        timezone: String,
        /// Activation instant.
        start_date_time: DateTime<Utc>,
        /// Deactivation instant.
        end_date_time: DateTime<Utc>,
        /// Bounds to apply.
        scaling: ScalingParameters,
    },
    /// Active on matching days between two times of day.
    Recurring {
        /// Schedule identifier.
        id: i64,
        /// Owning application.
        app_id: String,
        /// IANA timezone name the schedule was authored in.
        timezone: String,
        /// First day the recurrence applies.
        #[serde(default)]
        start_date: Option<NaiveDate>,
        /// Last day the recurrence applies.
        #[serde(default)]
        end_date: Option<NaiveDate>,
        /// Daily activation time.
        start_time: NaiveTime,
        /// Daily deactivation time.
        end_time: NaiveTime,
        /// Matching days.
        days: RecurrenceDays,
        /// Bounds to apply.
        scaling: ScalingParameters,
    },
}

impl ScheduleDefinition {
    /// Schedule identifier.
    pub const fn id(&self) -> i64 {
        match self {
            Self::SpecificDate { id, .. } | Self::Recurring { id, .. } => *id,
        }
    }

    /// Owning application.
    pub fn app_id(&self) -> &str {
        match self {
            Self::SpecificDate { app_id, .. } | Self::Recurring { app_id, .. } => app_id,
        }
    }

    /// Bounds to apply while active.
    pub const fn scaling(&self) -> &ScalingParameters {
        match self {
            Self::SpecificDate { scaling, .. } | Self::Recurring { scaling, .. } => scaling,
        }
    }

    /// Whether this is a specific-date schedule.
    pub const fn is_specific_date(&self) -> bool {
        matches!(self, Self::SpecificDate { .. })
    }
}
