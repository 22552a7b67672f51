// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// What a fire does when an earlier automation run is still in progress.
///
/// - `Allow`: start another independent session alongside it (default).
///   Overlapping sessions do not share state but do contend for the same
///   driver endpoint and may race on the target site.
/// - `Skip`: at most one run at a time; a fire that finds the gate taken is
///   logged and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    #[default]
    Allow,
    Skip,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(OverlapPolicy::Allow),
            "skip" => Ok(OverlapPolicy::Skip),
            other => Err(format!(
                "invalid overlap policy: {other} (expected \"allow\" or \"skip\")"
            )),
        }
    }
}

/// Why an automation run was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerReason {
    /// The one-off run fired right after the driver became ready.
    Startup,
    /// A calendar trigger came due.
    Calendar { expression: String },
    /// Requested explicitly (`--once`).
    Manual,
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerReason::Startup => f.write_str("startup"),
            TriggerReason::Calendar { expression } => write!(f, "calendar({expression})"),
            TriggerReason::Manual => f.write_str("manual"),
        }
    }
}
