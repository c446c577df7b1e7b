//! Active-schedule store backends.

pub mod memory;

pub use memory::InMemoryActiveScheduleStore;
