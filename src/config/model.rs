// src/config/model.rs

use serde::Deserialize;

use crate::automation::RefreshScript;
use crate::driver::DriverSettings;
use crate::schedule::Trigger;
use crate::types::OverlapPolicy;

/// Configuration as read from a TOML file, before validation.
///
/// Every section is optional; an empty file (or no file at all) yields the
/// stock setup: `chromedriver --port=9515`, three daily triggers and the
/// default selector sequence.
///
/// ```toml
/// [driver]
/// binary = "chromedriver"
/// port = 9515
/// readiness_attempts = 10
/// readiness_interval = "500ms"
///
/// [schedule]
/// triggers = ["0 9 * * *", "0 14 * * *", "0 18 * * *"]
/// overlap = "allow"
///
/// [site]
/// settle_after_login = "5s"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub driver: DriverSection,

    #[serde(default)]
    pub browser: BrowserSection,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub schedule: ScheduleSection,

    #[serde(default)]
    pub credentials: CredentialsSection,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so triggers, durations and locators are already parsed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub driver: DriverSettings,
    pub browser: BrowserSettings,
    pub script: RefreshScript,
    pub schedule: ScheduleSettings,
    pub credentials: CredentialsSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        driver: DriverSettings,
        browser: BrowserSettings,
        script: RefreshScript,
        schedule: ScheduleSettings,
        credentials: CredentialsSection,
    ) -> Self {
        Self {
            driver,
            browser,
            script,
            schedule,
            credentials,
        }
    }
}

/// `[driver]` section: the local automation-driver subprocess.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverSection {
    #[serde(default = "default_driver_binary")]
    pub binary: String,

    /// Arguments passed to the driver; `{port}` is replaced with `port`.
    #[serde(default = "default_driver_args")]
    pub args: Vec<String>,

    #[serde(default = "default_driver_host")]
    pub host: String,

    #[serde(default = "default_driver_port")]
    pub port: u16,

    #[serde(default = "default_status_path")]
    pub status_path: String,

    #[serde(default = "default_hub_path")]
    pub hub_path: String,

    /// Number of health checks before the driver is declared dead.
    #[serde(default = "default_readiness_attempts")]
    pub readiness_attempts: u32,

    /// Spacing between health checks, e.g. `"500ms"`.
    #[serde(default = "default_readiness_interval")]
    pub readiness_interval: String,
}

fn default_driver_binary() -> String {
    "chromedriver".to_string()
}

fn default_driver_args() -> Vec<String> {
    vec!["--port={port}".to_string()]
}

fn default_driver_host() -> String {
    "localhost".to_string()
}

fn default_driver_port() -> u16 {
    9515
}

fn default_status_path() -> String {
    "/status".to_string()
}

fn default_hub_path() -> String {
    "/wd/hub".to_string()
}

fn default_readiness_attempts() -> u32 {
    10
}

fn default_readiness_interval() -> String {
    "500ms".to_string()
}

impl Default for DriverSection {
    fn default() -> Self {
        Self {
            binary: default_driver_binary(),
            args: default_driver_args(),
            host: default_driver_host(),
            port: default_driver_port(),
            status_path: default_status_path(),
            hub_path: default_hub_path(),
            readiness_attempts: default_readiness_attempts(),
            readiness_interval: default_readiness_interval(),
        }
    }
}

/// `[browser]` section: capabilities requested for every session.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSection {
    #[serde(default = "default_browser_name")]
    pub name: String,

    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,

    /// Upper bound for a single WebDriver HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

fn default_browser_name() -> String {
    "chrome".to_string()
}

fn default_browser_args() -> Vec<String> {
    vec![
        "--headless".to_string(),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
    ]
}

fn default_request_timeout() -> String {
    "60s".to_string()
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            name: default_browser_name(),
            args: default_browser_args(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Resolved `[browser]` section.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub name: String,
    pub args: Vec<String>,
    pub request_timeout: std::time::Duration,
}

impl BrowserSettings {
    /// Capabilities object for a new session.
    pub fn capabilities(&self) -> serde_json::Value {
        serde_json::json!({
            "browserName": self.name,
            "goog:chromeOptions": { "args": self.args },
        })
    }
}

/// `[site]` section: the page and the selector sequence of one run.
///
/// Locators use `id:`, `css:` or `xpath:` prefixes.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    #[serde(default = "default_username_field")]
    pub username_field: String,

    #[serde(default = "default_password_field")]
    pub password_field: String,

    #[serde(default = "default_submit_button")]
    pub submit_button: String,

    #[serde(default = "default_edit_control")]
    pub edit_control: String,

    #[serde(default = "default_save_button")]
    pub save_button: String,

    /// Fixed wait after submitting the login form. The site exposes no
    /// readiness signal, so this stays a tunable approximation.
    #[serde(default = "default_settle_after_login")]
    pub settle_after_login: String,

    /// Fixed wait for the edit surface to render.
    #[serde(default = "default_settle_after_edit")]
    pub settle_after_edit: String,
}

fn default_profile_url() -> String {
    "https://www.naukri.com/mnjuser/profile".to_string()
}

fn default_username_field() -> String {
    "id:usernameField".to_string()
}

fn default_password_field() -> String {
    "id:passwordField".to_string()
}

fn default_submit_button() -> String {
    "xpath://button[@type='submit']".to_string()
}

fn default_edit_control() -> String {
    "xpath://span[text()='Resume headline']/following::span[text()='edit']".to_string()
}

fn default_save_button() -> String {
    "xpath://button[text()='Save']".to_string()
}

fn default_settle_after_login() -> String {
    "5s".to_string()
}

fn default_settle_after_edit() -> String {
    "2s".to_string()
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            profile_url: default_profile_url(),
            username_field: default_username_field(),
            password_field: default_password_field(),
            submit_button: default_submit_button(),
            edit_control: default_edit_control(),
            save_button: default_save_button(),
            settle_after_login: default_settle_after_login(),
            settle_after_edit: default_settle_after_edit(),
        }
    }
}

/// `[schedule]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSection {
    /// Calendar expressions, evaluated in process-local time.
    #[serde(default = "default_triggers")]
    pub triggers: Vec<String>,

    /// Fire one run as soon as the driver is ready.
    #[serde(default = "default_run_at_startup")]
    pub run_at_startup: bool,

    #[serde(default)]
    pub overlap: OverlapPolicy,
}

fn default_triggers() -> Vec<String> {
    vec![
        "0 9 * * *".to_string(),
        "0 14 * * *".to_string(),
        "0 18 * * *".to_string(),
    ]
}

fn default_run_at_startup() -> bool {
    true
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            triggers: default_triggers(),
            run_at_startup: default_run_at_startup(),
            overlap: OverlapPolicy::default(),
        }
    }
}

/// Resolved `[schedule]` section.
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub triggers: Vec<Trigger>,
    pub run_at_startup: bool,
    pub overlap: OverlapPolicy,
}

/// `[credentials]` section: names of the environment variables holding the
/// secrets. The secrets themselves never appear in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsSection {
    #[serde(default = "default_principal_env")]
    pub principal_env: String,

    #[serde(default = "default_credential_env")]
    pub credential_env: String,
}

fn default_principal_env() -> String {
    "NAUKRI_USERNAME".to_string()
}

fn default_credential_env() -> String {
    "NAUKRI_PASSWORD".to_string()
}

impl Default for CredentialsSection {
    fn default() -> Self {
        Self {
            principal_env: default_principal_env(),
            credential_env: default_credential_env(),
        }
    }
}
