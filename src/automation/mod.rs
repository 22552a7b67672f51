// src/automation/mod.rs

//! The automation session runner.
//!
//! - [`backend`] defines the [`BrowserSession`] / [`SessionFactory`] seam and
//!   the real WebDriver-backed factory.
//! - [`script`] is the fixed step sequence of one refresh.
//! - [`runner`] wraps a run with session open/close, overlap gating and
//!   logging, and plugs into the scheduler as a [`crate::schedule::Job`].

pub mod backend;
pub mod runner;
pub mod script;

pub use backend::{BrowserSession, SessionFactory, WebDriverSessionFactory};
pub use runner::{RunOutcome, SessionRunner};
pub use script::{RefreshScript, Step, StepFailure};
