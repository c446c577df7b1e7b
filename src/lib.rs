//! # Scaling Schedule Executor
//!
//! Fires the start and stop transitions of autoscaling schedules and tells the
//! scaling engine about them.
//!
//! When a schedule trigger fires, the executor loads the job state for the
//! trigger, optionally records or removes the active schedule, and notifies the
//! scaling engine over HTTP. Connectivity failures leave the remote state
//! unknown, so the trigger is re-armed after a fixed interval with an
//! incremented counter until a configured cap is reached. Rejections by the
//! scaling engine are final.
//!
//! ## Key Features
//!
//! - **Explicit collaborators**: the scheduler, the active-schedule store and
//!   the notification client are traits handed to the executor
//! - **Bounded retries**: one counter per failing phase, each with its own cap
//! - **Atomic re-arm**: the incremented state and the next fire time are stored
//!   in one step
//! - **Observable firings**: every firing runs in a `tracing` span and ends in a
//!   [`core::FiringOutcome`] that is also recorded to an audit sink
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scaling_schedule_executor::builders::build_executor;
//! use scaling_schedule_executor::config::ExecutorConfig;
//! use scaling_schedule_executor::infra::InMemoryTriggerStore;
//! use scaling_schedule_executor::runtime::{TokioSpawner, TriggerDriver};
//!
//! let cfg = ExecutorConfig::from_env()?;
//! let triggers = InMemoryTriggerStore::new();
//! let executor = Arc::new(build_executor(&cfg, triggers.clone())?);
//! let driver = TriggerDriver::new(executor, TokioSpawner::current());
//! driver.run(tokio::signal::ctrl_c().map(|_| ())).await;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core firing abstractions: job state, retry policy and the action executor.
pub mod core;
/// Configuration for the scaling engine endpoint and retry caps.
pub mod config;
/// Builders to construct executor components from configuration.
pub mod builders;
/// In-memory collaborators for triggers, active schedules and schedule definitions.
pub mod infra;
/// Runtime adapters: spawning and the trigger driver.
pub mod runtime;
/// Shared utilities.
pub mod util;
