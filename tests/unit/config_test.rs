//! Tests for configuration validation

use std::time::Duration;

use scaling_schedule_executor::config::ExecutorConfig;
use scaling_schedule_executor::core::{ConfigError, RescheduleCount};

#[test]
fn test_executor_config_validation() {
    let valid = ExecutorConfig::new("http://scalingengine.service.cf.internal:6104");
    assert!(valid.validate().is_ok());
}

#[test]
fn test_executor_config_missing_url() {
    let invalid = ExecutorConfig::new("  ");
    assert!(matches!(invalid.validate(), Err(ConfigError::Missing(_))));
}

#[test]
fn test_executor_config_relative_url() {
    let invalid = ExecutorConfig::new("scalingengine/v1");
    assert!(matches!(invalid.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_executor_config_non_http_scheme() {
    let invalid = ExecutorConfig::new("ftp://scalingengine");
    assert!(matches!(invalid.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_executor_config_zero_interval() {
    let mut invalid = ExecutorConfig::new("http://engine");
    invalid.job_reschedule_interval_ms = 0;
    assert!(invalid.validate().is_err());
}

#[test]
fn test_executor_config_zero_timeout() {
    let mut invalid = ExecutorConfig::new("http://engine");
    invalid.notification_timeout_secs = 0;
    assert!(invalid.validate().is_err());
}

#[test]
fn test_zero_caps_are_allowed() {
    let mut cfg = ExecutorConfig::new("http://engine");
    cfg.max_job_reschedule_count = 0;
    cfg.max_scaling_engine_notification_reschedule_count = 0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_executor_config_from_json() {
    let json = r#"{
        "scaling_engine_url": "https://engine.example.com",
        "job_reschedule_interval_ms": 500,
        "max_job_reschedule_count": 2,
        "max_scaling_engine_notification_reschedule_count": 4,
        "notification_timeout_secs": 3
    }"#;

    let config = ExecutorConfig::from_json_str(json).unwrap();
    let policy = config.retry_policy();
    assert_eq!(policy.delay(), Duration::from_millis(500));
    assert_eq!(policy.max_for(RescheduleCount::ActiveSchedule), 2);
    assert_eq!(policy.max_for(RescheduleCount::ScalingEngineNotification), 4);
    assert_eq!(config.notification_timeout(), Duration::from_secs(3));
}

#[test]
fn test_executor_config_accepts_original_option_names() {
    let json = r#"{
        "scalingEngineUrl": "http://engine",
        "jobRescheduleIntervalMilliSecond": 100,
        "maxJobRescheduleCount": 6,
        "maxScalingEngineNotificationRescheduleCount": 1
    }"#;

    let config = ExecutorConfig::from_json_str(json).unwrap();
    assert_eq!(config.max_job_reschedule_count, 6);
    assert_eq!(config.max_scaling_engine_notification_reschedule_count, 1);
    assert_eq!(config.notification_timeout_secs, 10);
}

#[test]
fn test_executor_config_malformed_json() {
    let err = ExecutorConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
