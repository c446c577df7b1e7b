//! Builders to construct executor components from configuration.

pub mod executor_builder;

pub use executor_builder::{build_executor, build_notification_client};
