//! Configuration models for the executor and its retry policy.

pub mod executor;

pub use executor::ExecutorConfig;
