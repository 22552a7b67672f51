// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{error, info};

use crate::automation::{RunOutcome, SessionFactory, SessionRunner, WebDriverSessionFactory};
use crate::config::{ConfigFile, Credentials};
use crate::driver::DriverSupervisor;
use crate::errors::Result;
use crate::schedule::{Job, JobScheduler};
use crate::types::TriggerReason;
use crate::webdriver::WebDriverClient;

/// The lifecycle coordinator.
///
/// Owns the [`DriverSupervisor`] outright; start and stop only ever happen
/// on this struct's sequential startup/shutdown path, which is why the
/// child handle needs no lock. Scheduled runs get the driver's URL, never
/// the handle.
pub struct Runtime {
    config: ConfigFile,
    credentials: Credentials,
    supervisor: DriverSupervisor,
    factory: Option<Arc<dyn SessionFactory>>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("supervisor", &self.supervisor)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(config: ConfigFile, credentials: Credentials) -> Self {
        let supervisor = DriverSupervisor::new(config.driver.clone());
        Self {
            config,
            credentials,
            supervisor,
            factory: None,
        }
    }

    /// Replace the WebDriver-backed session factory (used by tests).
    pub fn with_session_factory(mut self, factory: Arc<dyn SessionFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn supervisor(&self) -> &DriverSupervisor {
        &self.supervisor
    }

    /// Bring the driver up, start the scheduler and wait for `shutdown`.
    ///
    /// `shutdown` is polled from the start, so a signal that arrives while
    /// the driver is still coming up stops it and returns `Ok(())` as well.
    /// If the driver cannot be spawned or never becomes ready, the
    /// supervisor is stopped and the error is returned without the
    /// scheduler ever being registered.
    pub async fn run_until<S>(&mut self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let job: Arc<dyn Job> = self.session_runner()?;
        if !self.bring_up_unless(shutdown.as_mut()).await? {
            return Ok(());
        }

        let scheduler = JobScheduler::new(self.config.schedule.triggers.clone());
        if self.config.schedule.run_at_startup {
            JobScheduler::run_now(&job, TriggerReason::Startup);
        }
        let handle = scheduler.start(job);
        info!("waiting for job triggers");

        shutdown.await;
        info!("shutdown requested; stopping scheduler and driver");

        handle.abort();
        self.supervisor.stop().await;
        Ok(())
    }

    /// Bring the driver up, perform a single run, tear the driver down.
    ///
    /// Returns `None` when `shutdown` resolves before the driver is ready.
    /// A shutdown during the run stops the driver straight away; the run
    /// then fails at whatever step it was on and still closes its session.
    pub async fn run_once<S>(&mut self, shutdown: S) -> Result<Option<RunOutcome>>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let runner = self.session_runner()?;
        if !self.bring_up_unless(shutdown.as_mut()).await? {
            return Ok(None);
        }

        let run = runner.run_once(TriggerReason::Manual);
        tokio::pin!(run);

        let outcome = tokio::select! {
            outcome = &mut run => outcome,
            _ = &mut shutdown => {
                info!("shutdown requested during the run; stopping driver");
                self.supervisor.stop().await;
                run.await
            }
        };

        self.supervisor.stop().await;
        Ok(Some(outcome))
    }

    /// [`bring_up`](Self::bring_up), abandoned if `shutdown` resolves first.
    ///
    /// Returns `Ok(false)` after a shutdown, with the driver already stopped.
    async fn bring_up_unless(
        &mut self,
        shutdown: Pin<&mut impl Future<Output = ()>>,
    ) -> Result<bool> {
        let ready = tokio::select! {
            biased;
            _ = shutdown => None,
            result = self.bring_up() => Some(result),
        };

        match ready {
            Some(result) => result.map(|()| true),
            None => {
                info!("shutdown requested while the driver was starting; stopping it");
                self.supervisor.stop().await;
                Ok(false)
            }
        }
    }

    async fn bring_up(&mut self) -> Result<()> {
        self.supervisor.start()?;

        if let Err(err) = self.supervisor.await_ready().await {
            error!(error = %err, "driver never became ready; stopping it");
            self.supervisor.stop().await;
            return Err(err);
        }

        Ok(())
    }

    fn session_runner(&self) -> Result<Arc<SessionRunner>> {
        let factory = match &self.factory {
            Some(factory) => Arc::clone(factory),
            None => {
                let client = WebDriverClient::new(
                    self.config.driver.hub_url(),
                    self.config.browser.request_timeout,
                )?;
                Arc::new(WebDriverSessionFactory::new(
                    client,
                    self.config.browser.capabilities(),
                ))
            }
        };

        Ok(Arc::new(SessionRunner::new(
            factory,
            self.config.script.clone(),
            self.credentials.clone(),
            self.config.schedule.overlap,
        )))
    }
}
