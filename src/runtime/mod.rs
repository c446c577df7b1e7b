//! Runtime adapters: task spawning and the trigger driver loop.

pub mod spawn;
#[cfg(feature = "tokio-runtime")]
pub mod driver;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use spawn::Spawn;
#[cfg(feature = "tokio-runtime")]
pub use driver::TriggerDriver;
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
