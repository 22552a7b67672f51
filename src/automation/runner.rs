// src/automation/runner.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::automation::backend::SessionFactory;
use crate::automation::script::{RefreshScript, Step};
use crate::config::Credentials;
use crate::schedule::{BoxFuture, Job};
use crate::types::{OverlapPolicy, TriggerReason};

/// Result of a single run, for callers that care (tests, `--once`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed(Step),
    /// Dropped because another run held the gate (`overlap = "skip"`).
    Skipped,
}

/// Executes the refresh script once per invocation.
///
/// Each invocation opens its own session, so concurrent invocations never
/// share session state. Every failure is logged and folded into
/// [`RunOutcome`]; nothing propagates to the scheduler.
pub struct SessionRunner {
    factory: Arc<dyn SessionFactory>,
    script: RefreshScript,
    credentials: Credentials,
    overlap: OverlapPolicy,
    gate: Mutex<()>,
    next_run_id: AtomicU64,
}

impl SessionRunner {
    pub fn new(
        factory: Arc<dyn SessionFactory>,
        script: RefreshScript,
        credentials: Credentials,
        overlap: OverlapPolicy,
    ) -> Self {
        Self {
            factory,
            script,
            credentials,
            overlap,
            gate: Mutex::new(()),
            next_run_id: AtomicU64::new(0),
        }
    }

    /// Open a session, drive the script, close the session.
    ///
    /// Once a session has been opened it is closed exactly once, whichever
    /// step the run stops at. A failed close is logged and does not change
    /// the outcome.
    pub async fn run_once(&self, reason: TriggerReason) -> RunOutcome {
        let run_id = self.next_run_id.fetch_add(1, Ordering::SeqCst) + 1;

        let _gate = match self.overlap {
            OverlapPolicy::Allow => None,
            OverlapPolicy::Skip => match self.gate.try_lock() {
                Ok(guard) => Some(guard),
                Err(_) => {
                    warn!(run_id, %reason, "previous run still in progress; skipping this fire");
                    return RunOutcome::Skipped;
                }
            },
        };

        info!(run_id, %reason, "starting profile refresh");
        let started = Instant::now();

        let session = match self.factory.open_session().await {
            Ok(session) => session,
            Err(err) => {
                error!(run_id, step = %Step::OpenSession, error = %err, "failed to open browser session");
                return RunOutcome::Failed(Step::OpenSession);
            }
        };
        let session_id = session.id().to_string();

        let result = self
            .script
            .drive(session.as_ref(), &self.credentials, run_id)
            .await;

        if let Err(err) = session.close().await {
            warn!(run_id, session = %session_id, error = %err, "failed to close browser session");
        }

        match result {
            Ok(()) => {
                info!(
                    run_id,
                    session = %session_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "profile refreshed successfully"
                );
                RunOutcome::Completed
            }
            Err(failure) => {
                error!(
                    run_id,
                    session = %session_id,
                    step = %failure.step,
                    code = failure.source.code().unwrap_or("-"),
                    error = %failure.source,
                    "profile refresh aborted"
                );
                RunOutcome::Failed(failure.step)
            }
        }
    }
}

impl Job for SessionRunner {
    fn run(&self, reason: TriggerReason) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.run_once(reason).await;
        })
    }
}
