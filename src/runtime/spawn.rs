//! Task spawning abstraction.

use std::future::Future;

/// Runs detached firings on some executor.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
