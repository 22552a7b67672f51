// src/driver/mod.rs

//! Supervision of the local automation-driver subprocess.
//!
//! - [`supervisor`] owns the single child handle: start, stop, introspection.
//! - [`readiness`] polls the driver's HTTP status endpoint with a bounded
//!   attempt budget.

pub mod readiness;
pub mod supervisor;

pub use readiness::{wait_until_ready, ReadinessPolicy};
pub use supervisor::DriverSupervisor;

/// Resolved `[driver]` configuration.
#[derive(Debug, Clone)]
pub struct DriverSettings {
    pub binary: String,
    /// Arguments with `{port}` already substituted.
    pub args: Vec<String>,
    pub host: String,
    pub port: u16,
    pub status_path: String,
    pub hub_path: String,
    pub readiness: ReadinessPolicy,
}

impl DriverSettings {
    /// Health endpoint, e.g. `http://localhost:9515/status`.
    pub fn status_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.status_path)
    }

    /// Automation endpoint, e.g. `http://localhost:9515/wd/hub`.
    pub fn hub_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.hub_path)
    }
}
