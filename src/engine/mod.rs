// src/engine/mod.rs

//! Lifecycle coordination.
//!
//! [`runtime`] owns the driver supervisor and orders startup
//! (driver → readiness → scheduler) and teardown; [`shutdown`] turns OS
//! signals into a future the runtime can wait on.

pub mod runtime;
pub mod shutdown;

pub use runtime::Runtime;
pub use shutdown::shutdown_signal;
