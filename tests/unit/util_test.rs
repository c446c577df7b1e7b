//! Tests for clock and telemetry utilities

use chrono::{Duration, TimeZone, Utc};
use scaling_schedule_executor::util::{init_tracing, now_ms, Clock, ManualClock, SystemClock};

#[test]
fn test_system_clock_tracks_now() {
    let before = Utc::now();
    let now = SystemClock.now();
    assert!(now >= before);
}

#[test]
fn test_manual_clock_is_shared_between_clones() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    let handle = clock.clone();
    handle.advance(Duration::seconds(30));
    assert_eq!(clock.now(), start + Duration::seconds(30));
}

#[test]
fn test_now_ms_matches_system_clock() {
    let ms = now_ms();
    let sys = u128::try_from(SystemClock.now().timestamp_millis()).unwrap();
    assert!(sys >= ms && sys - ms < 1_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialized twice without panicking");
}
