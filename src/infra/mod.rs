//! Infrastructure adapters for triggers, active schedules and schedule definitions.

pub mod active_schedule;
pub mod schedule;
pub mod trigger;
pub use active_schedule::InMemoryActiveScheduleStore;
pub use schedule::InMemoryScheduleStore;
pub use trigger::InMemoryTriggerStore;
