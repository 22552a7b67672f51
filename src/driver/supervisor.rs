// src/driver/supervisor.rs

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::driver::readiness::wait_until_ready;
use crate::driver::DriverSettings;
use crate::errors::{RefresherError, Result};

/// Owner of the driver subprocess.
///
/// Holds at most one live child. The lifecycle coordinator is the only
/// caller of [`start`](Self::start) and [`stop`](Self::stop); automation runs
/// only ever talk to the driver over HTTP and never see this handle.
#[derive(Debug)]
pub struct DriverSupervisor {
    settings: DriverSettings,
    child: Option<Child>,
}

impl DriverSupervisor {
    pub fn new(settings: DriverSettings) -> Self {
        Self {
            settings,
            child: None,
        }
    }

    /// Whether a child handle is currently held.
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Spawn the driver with its output going to our own stdout/stderr.
    ///
    /// A second call while a child is held does not spawn again and returns
    /// the existing PID.
    pub fn start(&mut self) -> Result<Option<u32>> {
        if let Some(child) = &self.child {
            warn!(pid = ?child.id(), "driver already started; not spawning another");
            return Ok(child.id());
        }

        info!(
            binary = %self.settings.binary,
            args = ?self.settings.args,
            port = self.settings.port,
            "starting driver"
        );

        let child = Command::new(&self.settings.binary)
            .args(&self.settings.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RefresherError::DriverSpawn {
                binary: self.settings.binary.clone(),
                source,
            })?;

        let pid = child.id();
        debug!(?pid, "driver process spawned");
        self.child = Some(child);
        Ok(pid)
    }

    /// Poll the driver's status endpoint within the configured budget.
    pub async fn await_ready(&self) -> Result<u32> {
        wait_until_ready(&self.settings.status_url(), self.settings.readiness).await
    }

    /// Kill and reap the driver if one is held; otherwise do nothing.
    ///
    /// Never fails: a kill error (e.g. the process already exited and was
    /// reaped) is logged and the handle is cleared regardless.
    pub async fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            debug!("driver stop requested but no driver is running");
            return;
        };

        let pid = child.id();
        match child.kill().await {
            Ok(()) => info!(?pid, "driver stopped"),
            Err(err) => warn!(?pid, error = %err, "failed to kill driver; handle cleared anyway"),
        }
    }
}
