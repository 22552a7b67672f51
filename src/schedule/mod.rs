// src/schedule/mod.rs

//! Calendar-based job scheduling.
//!
//! - [`trigger`] parses calendar expressions and computes fire times.
//! - [`scheduler`] runs the background dispatch loop and defines the [`Job`]
//!   seam through which the automation runner is invoked.

pub mod scheduler;
pub mod trigger;

pub use scheduler::{BoxFuture, Job, JobScheduler, SchedulerHandle};
pub use trigger::{next_due, Trigger};
