//! Schedule definition store backends.

pub mod memory;

pub use memory::InMemoryScheduleStore;
