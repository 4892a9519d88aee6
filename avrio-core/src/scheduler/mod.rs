//! Periodic job scheduler
//!
//! A [`Scheduler`] is an event handler for one clock tick event type. Each
//! tick advances its millisecond time and runs the jobs that are due.

pub mod executor;
pub mod job;

pub use executor::{ScheduleError, Scheduler};
pub use job::{FnJob, Job, JobTiming};
