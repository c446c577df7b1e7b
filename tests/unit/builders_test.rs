//! Tests for builder modules

use scaling_schedule_executor::builders::{build_executor, build_notification_client};
use scaling_schedule_executor::config::ExecutorConfig;
use scaling_schedule_executor::core::{ExecutorError, RescheduleCount};
use scaling_schedule_executor::infra::InMemoryTriggerStore;

#[test]
fn test_build_executor_uses_config_policy() {
    let mut cfg = ExecutorConfig::new("http://engine:8080/");
    cfg.max_scaling_engine_notification_reschedule_count = 9;

    let executor = build_executor(&cfg, InMemoryTriggerStore::new()).unwrap();
    assert_eq!(
        executor.policy().max_for(RescheduleCount::ScalingEngineNotification),
        9
    );
    assert_eq!(executor.policy(), &cfg.retry_policy());
}

#[test]
fn test_build_notification_client_trims_base_url() {
    let cfg = ExecutorConfig::new("http://engine:8080/");
    let client = build_notification_client(&cfg).unwrap();
    assert_eq!(
        client.active_schedule_url("app-1", 42),
        "http://engine:8080/v1/apps/app-1/active_schedules/42"
    );
}

#[test]
fn test_build_executor_rejects_invalid_config() {
    let cfg = ExecutorConfig::new("not a url");
    let result = build_executor(&cfg, InMemoryTriggerStore::new());
    assert!(matches!(result, Err(ExecutorError::Config(_))));
}
