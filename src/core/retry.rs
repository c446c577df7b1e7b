//! Retry decisions for failed firings.
//!
//! Only failures that leave the remote state unknown are retried, after a
//! fixed delay, until the counter for the failing phase reaches its cap.
//! Rejections by the scaling engine (4xx and every other non-2xx) are final.

use std::time::Duration;

use crate::core::notification::NotificationOutcome;
use crate::core::state::{RescheduleCount, RetryCounter};

/// Why no retry is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveUpReason {
    /// The outcome is final on its own (success or rejection).
    Terminal,
    /// The counter reached its maximum.
    Exhausted,
}

/// Result of consulting the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-fire after `delay`; the caller increments the counter.
    Retry {
        /// Time until the next firing.
        delay: Duration,
    },
    /// Do not re-fire.
    GiveUp(GiveUpReason),
}

impl RetryDecision {
    /// Whether this decision schedules another firing.
    pub const fn is_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }
}

/// Fixed-delay, bounded retry policy with one cap per counter kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
    max_active_schedule: u32,
    max_notification: u32,
}

impl RetryPolicy {
    /// Policy retrying every `delay` with separate caps for the two counters.
    pub const fn new(delay: Duration, max_active_schedule: u32, max_notification: u32) -> Self {
        Self {
            delay,
            max_active_schedule,
            max_notification,
        }
    }

    /// Fixed delay between firings.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Configured cap for a counter kind.
    pub const fn max_for(&self, kind: RescheduleCount) -> u32 {
        match kind {
            RescheduleCount::ActiveSchedule => self.max_active_schedule,
            RescheduleCount::ScalingEngineNotification => self.max_notification,
        }
    }

    /// Decide what follows a notification outcome.
    pub fn decide(
        &self,
        outcome: &NotificationOutcome,
        kind: RescheduleCount,
        current: RetryCounter,
        max: u32,
    ) -> RetryDecision {
        match outcome {
            NotificationOutcome::Success
            | NotificationOutcome::ClientError { .. }
            | NotificationOutcome::ServerError { .. } => RetryDecision::GiveUp(GiveUpReason::Terminal),
            NotificationOutcome::ConnectivityError { .. } => {
                self.decide_retryable(kind, current, max)
            }
        }
    }

    /// Decide for a failure already known to be retryable.
    pub fn decide_retryable(
        &self,
        kind: RescheduleCount,
        current: RetryCounter,
        max: u32,
    ) -> RetryDecision {
        if current.is_exhausted(max) {
            tracing::error!(
                counter = %kind,
                retry_count = current.get(),
                max_count = max,
                "maximum reschedule count reached, giving up"
            );
            return RetryDecision::GiveUp(GiveUpReason::Exhausted);
        }
        RetryDecision::Retry { delay: self.delay }
    }
}
