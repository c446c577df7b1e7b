//! Builds an action executor from configuration.

use crate::config::ExecutorConfig;
use crate::core::{ActionExecutor, ExecutorError, ScalingEngineClient, SchedulerCollaborator};

/// Build the HTTP client for the configured scaling engine.
pub fn build_notification_client(cfg: &ExecutorConfig) -> Result<ScalingEngineClient, ExecutorError> {
    cfg.validate()?;
    ScalingEngineClient::new(&cfg.scaling_engine_url, cfg.notification_timeout())
}

/// Build an executor that notifies the configured scaling engine and
/// re-arms through `scheduler`.
///
/// Attach an active-schedule store or audit sink on the result as needed.
pub fn build_executor<S>(
    cfg: &ExecutorConfig,
    scheduler: S,
) -> Result<ActionExecutor<ScalingEngineClient, S>, ExecutorError>
where
    S: SchedulerCollaborator,
{
    let client = build_notification_client(cfg)?;
    let policy = cfg.retry_policy();
    tracing::info!(
        scaling_engine_url = %cfg.scaling_engine_url,
        interval_ms = cfg.job_reschedule_interval_ms,
        max_job_reschedule_count = cfg.max_job_reschedule_count,
        max_notification_reschedule_count = cfg.max_scaling_engine_notification_reschedule_count,
        "executor configured"
    );
    Ok(ActionExecutor::new(client, scheduler, policy))
}
