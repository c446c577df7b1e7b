//! Tests for error types

use scaling_schedule_executor::core::{
    ConfigError, ExecutorError, SchedulingError, StoreError, TriggerKey,
};

#[test]
fn test_trigger_not_found_error() {
    let err = SchedulingError::TriggerNotFound(TriggerKey::new("app-1", "42_start"));
    assert_eq!(format!("{}", err), "trigger not found: app-1.42_start");
}

#[test]
fn test_store_unavailable_error() {
    let err = StoreError::Unavailable("connection refused".to_string());
    assert_eq!(format!("{}", err), "store unavailable: connection refused");
}

#[test]
fn test_config_errors() {
    assert_eq!(
        format!("{}", ConfigError::Missing("SCALING_ENGINE_URL".into())),
        "missing configuration: SCALING_ENGINE_URL"
    );
    assert_eq!(
        format!("{}", ConfigError::Invalid("interval".into())),
        "invalid configuration: interval"
    );
}

#[test]
fn test_executor_error_is_transparent() {
    let err: ExecutorError = StoreError::Conflict("schedule 1".into()).into();
    assert_eq!(format!("{}", err), "conflict: schedule 1");

    let err: ExecutorError = SchedulingError::StoreUnavailable("down".into()).into();
    assert!(matches!(err, ExecutorError::Scheduling(_)));
}

#[test]
fn test_executor_error_into_anyhow() {
    let err: anyhow::Error = ExecutorError::from(ConfigError::Parse("eof".into())).into();
    assert_eq!(err.to_string(), "parse error: eof");
}
