// src/driver/readiness.rs

use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info};

use crate::errors::{RefresherError, Result};

/// Check budget for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_millis(500),
        }
    }
}

impl ReadinessPolicy {
    /// Per-check request timeout.
    pub fn check_timeout(&self) -> Duration {
        self.interval.max(Duration::from_millis(250))
    }

    /// Hard cap on the whole wait: `attempts` check slots.
    ///
    /// A hung endpoint uses up the budget at this rate, instead of paying a
    /// full check timeout plus an interval per attempt.
    pub fn budget(&self) -> Duration {
        self.check_timeout().saturating_mul(self.attempts)
    }
}

/// Poll `url` until it answers HTTP 200 or the budget is spent.
///
/// Returns the 1-based attempt that succeeded. No wait follows the last
/// failed check, and nothing runs past [`ReadinessPolicy::budget`].
pub async fn wait_until_ready(url: &str, policy: ReadinessPolicy) -> Result<u32> {
    let client = reqwest::Client::builder()
        .timeout(policy.check_timeout())
        .build()
        .map_err(|e| RefresherError::Other(e.into()))?;

    let deadline = Instant::now() + policy.budget();
    info!(
        %url,
        attempts = policy.attempts,
        budget = ?policy.budget(),
        "waiting for driver to become ready"
    );

    let mut checks = 0;
    for attempt in 1..=policy.attempts {
        checks = attempt;
        match timeout_at(deadline, client.get(url).send()).await {
            Ok(Ok(resp)) if resp.status() == StatusCode::OK => {
                info!(%url, attempt, "driver is ready");
                return Ok(attempt);
            }
            Ok(Ok(resp)) => {
                debug!(%url, attempt, status = %resp.status(), "driver not ready yet");
            }
            Ok(Err(err)) => {
                debug!(%url, attempt, error = %err, "driver status check failed");
            }
            Err(_) => {
                debug!(%url, attempt, "readiness budget ran out mid-check");
                break;
            }
        }

        if attempt < policy.attempts {
            let next = Instant::now() + policy.interval;
            if next >= deadline {
                break;
            }
            sleep_until(next).await;
        }
    }

    Err(RefresherError::DriverNotReady {
        url: url.to_string(),
        attempts: checks,
    })
}
