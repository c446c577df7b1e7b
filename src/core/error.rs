//! Error types for executor collaborators and configuration.

use thiserror::Error;

use crate::core::state::TriggerKey;

/// Failures reported by the scheduler collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulingError {
    /// The trigger was removed while the firing was in progress.
    #[error("trigger not found: {0}")]
    TriggerNotFound(TriggerKey),
    /// The trigger store could not be reached.
    #[error("trigger store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Failures reported by schedule and active-schedule stores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend could not be reached or rejected the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The record conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Configuration loading and validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A value is present but out of range or malformed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// The source could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
    /// A required option is absent.
    #[error("missing configuration: {0}")]
    Missing(String),
}

/// Errors surfaced while wiring or driving the executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Scheduler collaborator failure.
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// HTTP client construction failure.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
