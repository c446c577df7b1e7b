//! Trigger store backends.

pub mod memory;

pub use memory::InMemoryTriggerStore;
