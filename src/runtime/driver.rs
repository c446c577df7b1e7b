//! Timer loop that fires due triggers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::core::{ActionExecutor, NotificationClient, TriggerKey};
use crate::infra::InMemoryTriggerStore;
use crate::runtime::Spawn;
use crate::util::clock::{Clock, SystemClock};

const DEFAULT_TICK: Duration = Duration::from_millis(50);

/// Finishes a claimed key when the firing task ends, even by panic.
struct ClaimGuard {
    triggers: InMemoryTriggerStore,
    key: TriggerKey,
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        self.triggers.finish(&self.key);
    }
}

/// Polls the trigger store and spawns one firing per due trigger.
///
/// A key is claimed before its firing is spawned and finished when the
/// firing task ends, whether it returns, panics or is dropped unpolled, so the
/// same key never fires twice at once and is never stuck in flight.
pub struct TriggerDriver<N, Sp> {
    executor: Arc<ActionExecutor<N, InMemoryTriggerStore>>,
    spawner: Sp,
    clock: Arc<dyn Clock>,
    tick: Duration,
}

impl<N, Sp> TriggerDriver<N, Sp>
where
    N: NotificationClient + 'static,
    Sp: Spawn,
{
    /// Driver for the triggers `executor` re-arms into.
    pub fn new(executor: Arc<ActionExecutor<N, InMemoryTriggerStore>>, spawner: Sp) -> Self {
        Self {
            executor,
            spawner,
            clock: Arc::new(SystemClock),
            tick: DEFAULT_TICK,
        }
    }

    /// Poll interval.
    #[must_use]
    pub const fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Clock deciding which triggers are due.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Trigger store being driven.
    pub fn triggers(&self) -> &InMemoryTriggerStore {
        self.executor.scheduler()
    }

    /// Claim every due trigger and spawn its firing. Returns how many were spawned.
    pub fn tick_once(&self) -> usize {
        let due = self.triggers().claim_due(self.clock.now());
        let spawned = due.len();
        for key in due {
            let executor = Arc::clone(&self.executor);
            let claim = ClaimGuard {
                triggers: self.triggers().clone(),
                key: key.clone(),
            };
            self.spawner.spawn(async move {
                let _claim = claim;
                let outcome = executor.fire(&key).await;
                tracing::debug!(trigger_key = %key, outcome = outcome.label(), "firing finished");
            });
        }
        spawned
    }

    /// Tick until `shutdown` resolves. Firings already spawned keep running.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);
        tracing::info!(tick_ms = self.tick.as_millis(), "trigger driver started");
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    let spawned = self.tick_once();
                    if spawned > 0 {
                        tracing::debug!(spawned, "fired due triggers");
                    }
                }
            }
        }
        tracing::info!("trigger driver stopped");
    }
}
