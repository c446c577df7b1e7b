//! Action executor: what runs when a schedule trigger fires.
//!
//! One firing walks this state machine and ends in exactly one
//! [`FiringOutcome`]:
//!
//! ```text
//! FIRED ─▶ NOTIFYING ─┬─▶ SUCCEEDED
//!                     ├─▶ REJECTED           (4xx, other non-2xx)
//!                     ├─▶ RESCHEDULED ─▶ FIRED (next timer expiry)
//!                     ├─▶ EXHAUSTED
//!                     └─▶ SCHEDULING_FAILED
//! ```
//!
//! When an [`ActiveScheduleStore`] is attached, the active-schedule record is
//! written (start) or removed (stop) before notifying, and failures of that
//! phase are charged to the `ACTIVE_SCHEDULE` counter.
//!
//! No failure escapes [`ActionExecutor::fire`]: every branch is logged,
//! audited and turned into an outcome.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::Instrument;

use crate::core::audit::{build_audit_event, AuditSink};
use crate::core::collaborators::{ActiveScheduleStore, SchedulerCollaborator};
use crate::core::error::StoreError;
use crate::core::notification::{NotificationClient, NotificationOutcome};
use crate::core::retry::{RetryDecision, RetryPolicy};
use crate::core::schedule::ScheduleAction;
use crate::core::state::{JobExecutionState, RescheduleCount, TriggerKey};
use crate::util::clock::{Clock, SystemClock};

/// Audit sink shared between the executor and its firings.
pub type SharedAuditSink = Arc<Mutex<Box<dyn AuditSink>>>;

/// Terminal (or re-arming) state a firing ends in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiringOutcome {
    /// The scaling engine accepted the transition.
    Succeeded,
    /// The scaling engine rejected the transition.
    Rejected {
        /// HTTP status returned.
        status: u16,
        /// Response body.
        body: String,
    },
    /// A new firing was armed with an incremented counter.
    Rescheduled {
        /// Counter that was charged.
        counter: RescheduleCount,
        /// Counter value stored for the next firing.
        count: u32,
        /// When the next firing is due.
        next_fire_at: DateTime<Utc>,
    },
    /// The counter reached its cap; no further firing.
    Exhausted {
        /// Counter that ran out.
        counter: RescheduleCount,
        /// Configured cap.
        max: u32,
    },
    /// The scheduler collaborator could not load or re-arm the job.
    SchedulingFailed {
        /// Collaborator error.
        reason: String,
    },
}

impl FiringOutcome {
    /// Stable label used in audit events.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Rejected { .. } => "rejected",
            Self::Rescheduled { .. } => "rescheduled",
            Self::Exhausted { .. } => "exhausted",
            Self::SchedulingFailed { .. } => "scheduling_failed",
        }
    }

    /// Whether this firing lineage is over.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Rescheduled { .. })
    }
}

impl fmt::Display for FiringOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("succeeded"),
            Self::Rejected { status, body } => write!(f, "rejected with {status}: {body}"),
            Self::Rescheduled {
                counter,
                count,
                next_fire_at,
            } => write!(f, "rescheduled at {next_fire_at} ({counter}={count})"),
            Self::Exhausted { counter, max } => write!(f, "exhausted {counter} (max {max})"),
            Self::SchedulingFailed { reason } => write!(f, "scheduling failed: {reason}"),
        }
    }
}

/// Observability handle for one firing: its span and audit sink.
#[derive(Clone)]
pub struct FiringContext {
    trigger_key: TriggerKey,
    span: tracing::Span,
    audit: Option<SharedAuditSink>,
}

impl FiringContext {
    /// Context for a firing of `trigger_key`, auditing to `audit` if set.
    pub fn new(trigger_key: TriggerKey, audit: Option<SharedAuditSink>) -> Self {
        let span = tracing::info_span!(
            "firing",
            trigger_key = %trigger_key,
            app_id = tracing::field::Empty,
            schedule_id = tracing::field::Empty,
            action = tracing::field::Empty,
        );
        Self {
            trigger_key,
            span,
            audit,
        }
    }

    /// Trigger being fired.
    pub const fn trigger_key(&self) -> &TriggerKey {
        &self.trigger_key
    }

    /// Span all firing logs are emitted in.
    pub const fn span(&self) -> &tracing::Span {
        &self.span
    }

    fn bind(&self, state: &JobExecutionState) {
        self.span.record("app_id", state.app_id.as_str());
        self.span.record("schedule_id", state.schedule_id);
        self.span.record("action", state.action.as_str());
    }

    fn audit(&self, app_id: &str, schedule_id: i64, action: &str, payload: Option<String>) {
        if let Some(sink) = &self.audit {
            sink.lock().record(build_audit_event(
                self.trigger_key.to_string(),
                app_id,
                schedule_id,
                action,
                payload,
            ));
        }
    }

    fn audit_outcome(&self, state: &JobExecutionState, outcome: &FiringOutcome) {
        self.audit(
            &state.app_id,
            state.schedule_id,
            outcome.label(),
            Some(outcome.to_string()),
        );
    }
}

/// Runs trigger firings against explicit collaborators.
pub struct ActionExecutor<N, S> {
    notifier: N,
    scheduler: S,
    policy: RetryPolicy,
    active_schedules: Option<Arc<dyn ActiveScheduleStore>>,
    clock: Arc<dyn Clock>,
    audit: Option<SharedAuditSink>,
}

impl<N, S> ActionExecutor<N, S>
where
    N: NotificationClient,
    S: SchedulerCollaborator,
{
    /// Executor that only notifies; no active-schedule phase.
    pub fn new(notifier: N, scheduler: S, policy: RetryPolicy) -> Self {
        Self {
            notifier,
            scheduler,
            policy,
            active_schedules: None,
            clock: Arc::new(SystemClock),
            audit: None,
        }
    }

    /// Persist/remove the active-schedule record before notifying.
    #[must_use]
    pub fn with_active_schedule_store(mut self, store: Arc<dyn ActiveScheduleStore>) -> Self {
        self.active_schedules = Some(store);
        self
    }

    /// Override the clock used to compute fire times.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Retry policy in effect.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Scheduler collaborator in use.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Fire `trigger_key` with a fresh context.
    pub async fn fire(&self, trigger_key: &TriggerKey) -> FiringOutcome {
        let ctx = FiringContext::new(trigger_key.clone(), self.audit.clone());
        self.fire_with(&ctx).await
    }

    /// Fire the trigger described by `ctx`.
    pub async fn fire_with(&self, ctx: &FiringContext) -> FiringOutcome {
        let span = ctx.span().clone();
        self.run(ctx).instrument(span).await
    }

    async fn run(&self, ctx: &FiringContext) -> FiringOutcome {
        let state = match self.scheduler.get_job_state(ctx.trigger_key()).await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "failed to load job state");
                let outcome = FiringOutcome::SchedulingFailed {
                    reason: e.to_string(),
                };
                ctx.audit("", 0, outcome.label(), Some(outcome.to_string()));
                return outcome;
            }
        };
        ctx.bind(&state);
        tracing::debug!(
            active_schedule_retries = state.active_schedule_retry_count.get(),
            notification_retries = state.scaling_engine_notification_retry_count.get(),
            "job fired"
        );

        if let Some(store) = &self.active_schedules {
            if let Err(e) = Self::apply_active_schedule(store.as_ref(), &state).await {
                tracing::error!(error = %e, "active schedule phase failed");
                return self
                    .handle_job_rescheduling(ctx, &state, RescheduleCount::ActiveSchedule)
                    .await;
            }
        }

        let entity = state.active_schedule();
        let outcome = self.notifier.notify(state.action, &entity).await;
        ctx.audit(
            &state.app_id,
            state.schedule_id,
            "notify",
            Some(outcome.to_string()),
        );

        let result = match &outcome {
            NotificationOutcome::Success => FiringOutcome::Succeeded,
            // 5xx is final as well; see retry module.
            NotificationOutcome::ClientError { status, body }
            | NotificationOutcome::ServerError { status, body } => FiringOutcome::Rejected {
                status: *status,
                body: body.clone(),
            },
            NotificationOutcome::ConnectivityError { .. } => {
                let kind = RescheduleCount::ScalingEngineNotification;
                let max = self.policy.max_for(kind);
                match self.policy.decide(&outcome, kind, state.counter(kind), max) {
                    RetryDecision::Retry { delay } => {
                        return self.rearm(ctx, &state, kind, delay).await;
                    }
                    RetryDecision::GiveUp(_) => FiringOutcome::Exhausted { counter: kind, max },
                }
            }
        };
        ctx.audit_outcome(&state, &result);
        result
    }

    async fn apply_active_schedule(
        store: &dyn ActiveScheduleStore,
        state: &JobExecutionState,
    ) -> Result<(), StoreError> {
        match state.action {
            ScheduleAction::Start => store.upsert(&state.active_schedule()).await,
            ScheduleAction::Stop => {
                if !store.remove(&state.app_id, state.schedule_id).await? {
                    tracing::debug!("no active schedule to remove");
                }
                Ok(())
            }
        }
    }

    /// Charge a retryable failure to `kind` and re-arm the trigger, or give
    /// up once the counter is at its cap.
    pub async fn handle_job_rescheduling(
        &self,
        ctx: &FiringContext,
        state: &JobExecutionState,
        kind: RescheduleCount,
    ) -> FiringOutcome {
        let max = self.policy.max_for(kind);
        match self.policy.decide_retryable(kind, state.counter(kind), max) {
            RetryDecision::Retry { delay } => self.rearm(ctx, state, kind, delay).await,
            RetryDecision::GiveUp(_) => {
                let outcome = FiringOutcome::Exhausted { counter: kind, max };
                ctx.audit_outcome(state, &outcome);
                outcome
            }
        }
    }

    async fn rearm(
        &self,
        ctx: &FiringContext,
        state: &JobExecutionState,
        kind: RescheduleCount,
        delay: std::time::Duration,
    ) -> FiringOutcome {
        let now = self.clock.now();
        let next_fire_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let next = state.with_incremented(kind);
        let count = next.counter(kind).get();

        let outcome = match self
            .scheduler
            .reschedule(ctx.trigger_key(), next_fire_at, next)
            .await
        {
            Ok(()) => {
                tracing::warn!(
                    counter = %kind,
                    retry_count = count,
                    %next_fire_at,
                    "job rescheduled"
                );
                FiringOutcome::Rescheduled {
                    counter: kind,
                    count,
                    next_fire_at,
                }
            }
            Err(e) => {
                tracing::error!(
                    counter = %kind,
                    retry_count = state.counter(kind).get(),
                    error = %e,
                    "failed to reschedule job"
                );
                FiringOutcome::SchedulingFailed {
                    reason: e.to_string(),
                }
            }
        };
        ctx.audit_outcome(state, &outcome);
        outcome
    }
}
