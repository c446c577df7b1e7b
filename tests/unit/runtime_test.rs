//! Tests for tokio spawner and trigger driver

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use scaling_schedule_executor::core::{
    ActionExecutor, ActiveScheduleEntity, JobExecutionState, NotificationClient,
    NotificationOutcome, RetryPolicy, ScalingParameters, ScheduleAction, TriggerKey,
};
use scaling_schedule_executor::infra::InMemoryTriggerStore;
use scaling_schedule_executor::runtime::{Spawn, TokioSpawner, TriggerDriver};

/// Notifier that counts calls and answers with a fixed outcome after a delay.
struct CountingNotifier {
    calls: Arc<AtomicUsize>,
    outcome: NotificationOutcome,
    delay: Duration,
}

#[async_trait]
impl NotificationClient for CountingNotifier {
    async fn notify(
        &self,
        _action: ScheduleAction,
        _active_schedule: &ActiveScheduleEntity,
    ) -> NotificationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }
}

/// Notifier whose implementation panics mid-call.
struct PanickingNotifier;

#[async_trait]
impl NotificationClient for PanickingNotifier {
    async fn notify(
        &self,
        _action: ScheduleAction,
        _active_schedule: &ActiveScheduleEntity,
    ) -> NotificationOutcome {
        panic!("notifier bug");
    }
}

fn job(schedule_id: i64) -> (TriggerKey, JobExecutionState) {
    let key = TriggerKey::for_schedule("app-1", schedule_id, ScheduleAction::Start);
    let state = JobExecutionState::new(
        "app-1",
        schedule_id,
        ScheduleAction::Start,
        1_700_000_000,
        ScalingParameters {
            instance_min_count: 1,
            instance_max_count: 3,
            initial_min_instance_count: None,
        },
    );
    (key, state)
}

fn driver(
    outcome: NotificationOutcome,
    delay: Duration,
) -> (
    TriggerDriver<CountingNotifier, TokioSpawner>,
    InMemoryTriggerStore,
    Arc<AtomicUsize>,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let triggers = InMemoryTriggerStore::new();
    let notifier = CountingNotifier {
        calls: Arc::clone(&calls),
        outcome,
        delay,
    };
    let executor = ActionExecutor::new(
        notifier,
        triggers.clone(),
        RetryPolicy::new(Duration::from_millis(10), 5, 3),
    );
    let driver = TriggerDriver::new(Arc::new(executor), TokioSpawner::current())
        .with_tick(Duration::from_millis(5));
    (driver, triggers, calls)
}

async fn wait_until<F: Fn() -> bool>(cond: F) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_tokio_spawner_owned_runtime() {
    let (runtime, spawner) = TokioSpawner::multi_thread(Some(1)).unwrap();
    let (tx, rx) = std::sync::mpsc::channel();
    spawner.spawn(async move {
        tx.send(7).unwrap();
    });
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    drop(runtime);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_driver_fires_due_trigger_once() {
    let (driver, triggers, calls) = driver(NotificationOutcome::Success, Duration::ZERO);
    let (key, state) = job(1);
    triggers.add_job(key.clone(), state, Utc::now());

    assert_eq!(driver.tick_once(), 1);
    wait_until(|| triggers.is_empty()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(triggers.job_state(&key).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_driver_skips_future_trigger() {
    let (driver, triggers, calls) = driver(NotificationOutcome::Success, Duration::ZERO);
    let (key, state) = job(2);
    triggers.add_job(key, state, Utc::now() + chrono::Duration::hours(1));

    assert_eq!(driver.tick_once(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(triggers.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_driver_never_overlaps_a_key() {
    let (driver, triggers, calls) =
        driver(NotificationOutcome::Success, Duration::from_millis(100));
    let (key, state) = job(3);
    triggers.add_job(key.clone(), state.clone(), Utc::now());

    assert_eq!(driver.tick_once(), 1);
    // re-armed while the first firing is still notifying
    triggers.add_job(key.clone(), state, Utc::now());
    assert_eq!(driver.tick_once(), 0);
    assert!(triggers.is_in_flight(&key));

    wait_until(|| !triggers.is_in_flight(&key)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(driver.tick_once(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_driver_refires_rescheduled_trigger_until_exhausted() {
    let (driver, triggers, calls) = driver(
        NotificationOutcome::ConnectivityError {
            cause: "connection refused".into(),
        },
        Duration::ZERO,
    );
    let (key, state) = job(4);
    triggers.add_job(key, state, Utc::now());

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        driver
            .run(async {
                let _ = stop_rx.await;
            })
            .await;
    });

    // initial firing plus three retries, then the lineage ends
    wait_until(|| triggers.is_empty()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("driver stops on shutdown")
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_driver_releases_key_when_firing_panics() {
    let triggers = InMemoryTriggerStore::new();
    let executor = ActionExecutor::new(
        PanickingNotifier,
        triggers.clone(),
        RetryPolicy::new(Duration::from_millis(10), 5, 3),
    );
    let driver = TriggerDriver::new(Arc::new(executor), TokioSpawner::current());
    let (key, state) = job(5);
    triggers.add_job(key.clone(), state, Utc::now());

    assert_eq!(driver.tick_once(), 1);
    wait_until(|| !triggers.is_in_flight(&key)).await;
    // never re-armed, so the lineage is discarded instead of staying claimed
    assert!(triggers.is_empty());
}
