//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;

use crate::core::AppResult;
use crate::runtime::Spawn;

/// Tokio-based spawner that executes firings on a tokio runtime.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: Arc<tokio::runtime::Handle>,
}

impl TokioSpawner {
    /// Create a new `TokioSpawner` from a tokio runtime handle.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Spawner for the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like
    /// [`tokio::runtime::Handle::current`].
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }

    /// Build a multi-threaded runtime and a spawner bound to it.
    ///
    /// `worker_threads` defaults to the number of CPUs. The caller owns the
    /// runtime; spawned firings stop when it is dropped.
    pub fn multi_thread(
        worker_threads: Option<usize>,
    ) -> AppResult<(tokio::runtime::Runtime, Self)> {
        let threads = worker_threads.unwrap_or_else(num_cpus::get).max(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name("schedule-firing")
            .enable_all()
            .build()
            .with_context(|| format!("failed to build firing runtime with {threads} workers"))?;
        let spawner = Self::new(runtime.handle().clone());
        Ok((runtime, spawner))
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
