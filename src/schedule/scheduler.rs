// src/schedule/scheduler.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::Local;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::schedule::trigger::{next_due, Trigger};
use crate::types::TriggerReason;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Work fired by the scheduler.
///
/// Production uses the automation runner; tests plug in counters. A job
/// must absorb its own failures: the scheduler never looks at the outcome.
pub trait Job: Send + Sync + 'static {
    fn run(&self, reason: TriggerReason) -> BoxFuture<'_, ()>;
}

/// Fixed set of calendar triggers, registered once at startup.
#[derive(Debug, Clone)]
pub struct JobScheduler {
    triggers: Vec<Trigger>,
}

/// Handle to the background dispatch loop.
#[derive(Debug)]
pub struct SchedulerHandle {
    handle: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop dispatching new fires. Runs already spawned are not affected.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl JobScheduler {
    pub fn new(triggers: Vec<Trigger>) -> Self {
        Self { triggers }
    }

    /// Fire `job` once, right now, outside the calendar.
    pub fn run_now(job: &Arc<dyn Job>, reason: TriggerReason) -> JoinHandle<()> {
        let job = Arc::clone(job);
        info!(%reason, "dispatching immediate run");
        tokio::spawn(async move { job.run(reason).await })
    }

    /// Start the dispatch loop.
    ///
    /// Every due trigger is spawned as its own Tokio task; fires are never
    /// serialized or deduplicated here.
    pub fn start(self, job: Arc<dyn Job>) -> SchedulerHandle {
        let expressions: Vec<&str> = self.triggers.iter().map(Trigger::expression).collect();
        info!(triggers = ?expressions, "scheduler started");

        let handle = tokio::spawn(dispatch_loop(self.triggers, job));
        SchedulerHandle { handle }
    }
}

async fn dispatch_loop(triggers: Vec<Trigger>, job: Arc<dyn Job>) {
    if triggers.is_empty() {
        info!("no calendar triggers registered; dispatch loop idle");
        return;
    }

    // Fire times are computed strictly after the cursor, so an instant that
    // has just fired is never picked again even if the wall clock lags.
    let mut cursor = Local::now();

    loop {
        let Some((when, due)) = next_due(&triggers, &cursor) else {
            warn!("no upcoming fire times; dispatch loop exiting");
            return;
        };

        if let Ok(wait) = (when - Local::now()).to_std() {
            debug!(next = %when, ?wait, "sleeping until next trigger");
            sleep(wait).await;
        }

        for trigger in due {
            let job = Arc::clone(&job);
            let reason = TriggerReason::Calendar {
                expression: trigger.expression().to_string(),
            };
            info!(%reason, at = %when, "trigger fired");
            tokio::spawn(async move { job.run(reason).await });
        }

        cursor = when.max(Local::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        reasons: Mutex<Vec<TriggerReason>>,
        count: AtomicUsize,
    }

    impl Job for Recorder {
        fn run(&self, reason: TriggerReason) -> BoxFuture<'_, ()> {
            Box::pin(async move {
                self.reasons.lock().unwrap().push(reason);
                self.count.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn run_now_fires_exactly_once_with_given_reason() {
        let recorder = Arc::new(Recorder::default());
        let job: Arc<dyn Job> = recorder.clone();

        JobScheduler::run_now(&job, TriggerReason::Startup)
            .await
            .unwrap();

        assert_eq!(recorder.count.load(Ordering::SeqCst), 1);
        assert_eq!(
            recorder.reasons.lock().unwrap().as_slice(),
            &[TriggerReason::Startup]
        );
    }

    #[tokio::test]
    async fn per_second_trigger_fires_repeatedly() {
        let recorder = Arc::new(Recorder::default());
        let trigger: Trigger = "* * * * * *".parse().unwrap();
        let handle = JobScheduler::new(vec![trigger]).start(recorder.clone());

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        handle.abort();

        let fired = recorder.count.load(Ordering::SeqCst);
        assert!((2..=3).contains(&fired), "fired {fired} times in 2.5s");
        assert!(recorder
            .reasons
            .lock()
            .unwrap()
            .iter()
            .all(|r| matches!(r, TriggerReason::Calendar { expression } if expression == "* * * * * *")));
    }

    #[tokio::test]
    async fn empty_trigger_list_finishes_immediately() {
        let recorder = Arc::new(Recorder::default());
        let handle = JobScheduler::new(Vec::new()).start(recorder.clone());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
        assert_eq!(recorder.count.load(Ordering::SeqCst), 0);
    }
}
