//! Core firing abstractions: job state, retry policy and the action executor.

pub mod audit;
pub mod collaborators;
pub mod error;
pub mod executor;
pub mod notification;
pub mod retry;
pub mod schedule;
pub mod state;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink};
pub use collaborators::{ActiveScheduleStore, ScheduleStore, SchedulerCollaborator};
pub use error::{AppResult, ConfigError, ExecutorError, SchedulingError, StoreError};
pub use executor::{ActionExecutor, FiringContext, FiringOutcome, SharedAuditSink};
pub use notification::{NotificationClient, NotificationOutcome, ScalingEngineClient};
pub use retry::{GiveUpReason, RetryDecision, RetryPolicy};
pub use schedule::{
    ActiveScheduleEntity, RecurrenceDays, ScalingParameters, ScheduleAction, ScheduleDefinition,
};
pub use state::{JobExecutionState, RescheduleCount, RetryCounter, TriggerKey};
