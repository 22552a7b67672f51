// src/automation/script.rs

use std::fmt;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::automation::backend::BrowserSession;
use crate::config::Credentials;
use crate::webdriver::{Locator, WebDriverError};

/// Steps of one refresh run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    OpenSession,
    Navigate,
    LocateLoginForm,
    SubmitCredentials,
    OpenEditor,
    Save,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::OpenSession => "open-session",
            Step::Navigate => "navigate",
            Step::LocateLoginForm => "locate-login-form",
            Step::SubmitCredentials => "submit-credentials",
            Step::OpenEditor => "open-editor",
            Step::Save => "save",
        };
        f.write_str(name)
    }
}

/// A step that failed, with the driver error that caused it.
#[derive(Debug)]
pub struct StepFailure {
    pub step: Step,
    pub source: WebDriverError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} failed: {}", self.step, self.source)
    }
}

impl std::error::Error for StepFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Tag a driver result with the step it belongs to.
pub(crate) trait AtStep<T> {
    fn at(self, step: Step) -> Result<T, StepFailure>;
}

impl<T> AtStep<T> for Result<T, WebDriverError> {
    fn at(self, step: Step) -> Result<T, StepFailure> {
        self.map_err(|source| StepFailure { step, source })
    }
}

/// The selector sequence executed inside an open session.
///
/// Tightly coupled to the target site's current markup; a changed selector
/// surfaces as a failed run at the matching step.
#[derive(Debug, Clone)]
pub struct RefreshScript {
    pub profile_url: String,
    pub username_field: Locator,
    pub password_field: Locator,
    pub submit_button: Locator,
    pub edit_control: Locator,
    pub save_button: Locator,
    pub settle_after_login: Duration,
    pub settle_after_edit: Duration,
}

impl RefreshScript {
    /// Run steps 2..=6 against `session`, stopping at the first failure.
    ///
    /// Opening and closing the session is the caller's job.
    pub async fn drive(
        &self,
        session: &dyn BrowserSession,
        credentials: &Credentials,
        run_id: u64,
    ) -> Result<(), StepFailure> {
        session.goto(&self.profile_url).await.at(Step::Navigate)?;
        debug!(run_id, url = %self.profile_url, "profile page loaded");

        // All three must resolve before anything is typed.
        let username = session
            .find_element(&self.username_field)
            .await
            .at(Step::LocateLoginForm)?;
        let password = session
            .find_element(&self.password_field)
            .await
            .at(Step::LocateLoginForm)?;
        let submit = session
            .find_element(&self.submit_button)
            .await
            .at(Step::LocateLoginForm)?;

        session
            .send_keys(&username, credentials.principal())
            .await
            .at(Step::SubmitCredentials)?;
        session
            .send_keys(&password, credentials.credential())
            .await
            .at(Step::SubmitCredentials)?;
        session.click(&submit).await.at(Step::SubmitCredentials)?;
        info!(run_id, "login submitted; waiting for the page to settle");
        sleep(self.settle_after_login).await;

        let edit = session
            .find_element(&self.edit_control)
            .await
            .at(Step::OpenEditor)?;
        session.click(&edit).await.at(Step::OpenEditor)?;
        sleep(self.settle_after_edit).await;

        let save = session
            .find_element(&self.save_button)
            .await
            .at(Step::Save)?;
        session.click(&save).await.at(Step::Save)?;

        Ok(())
    }
}
