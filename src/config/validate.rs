// src/config/validate.rs

use std::str::FromStr;
use std::time::Duration;

use crate::automation::RefreshScript;
use crate::config::duration::parse_duration;
use crate::config::model::{
    BrowserSection, BrowserSettings, ConfigFile, DriverSection, RawConfigFile, ScheduleSection,
    ScheduleSettings, SiteSection,
};
use crate::driver::{DriverSettings, ReadinessPolicy};
use crate::errors::{RefresherError, Result};
use crate::schedule::Trigger;
use crate::webdriver::Locator;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RefresherError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let driver = resolve_driver(&raw.driver)?;
        let browser = resolve_browser(&raw.browser)?;
        let script = resolve_site(&raw.site)?;
        let schedule = resolve_schedule(&raw.schedule)?;
        validate_credential_names(&raw)?;

        Ok(ConfigFile::new_unchecked(
            driver,
            browser,
            script,
            schedule,
            raw.credentials,
        ))
    }
}

fn resolve_driver(section: &DriverSection) -> Result<DriverSettings> {
    if section.binary.trim().is_empty() {
        return Err(RefresherError::ConfigError(
            "[driver].binary must not be empty".to_string(),
        ));
    }

    if section.port == 0 {
        return Err(RefresherError::ConfigError(
            "[driver].port must be a fixed, non-zero port".to_string(),
        ));
    }

    if section.readiness_attempts == 0 {
        return Err(RefresherError::ConfigError(
            "[driver].readiness_attempts must be >= 1 (got 0)".to_string(),
        ));
    }

    let interval = duration_field("[driver].readiness_interval", &section.readiness_interval)?;

    let port = section.port.to_string();
    let args = section
        .args
        .iter()
        .map(|arg| arg.replace("{port}", &port))
        .collect();

    Ok(DriverSettings {
        binary: section.binary.clone(),
        args,
        host: section.host.clone(),
        port: section.port,
        status_path: leading_slash(&section.status_path),
        hub_path: leading_slash(&section.hub_path),
        readiness: ReadinessPolicy {
            attempts: section.readiness_attempts,
            interval,
        },
    })
}

fn resolve_browser(section: &BrowserSection) -> Result<BrowserSettings> {
    let request_timeout = duration_field("[browser].request_timeout", &section.request_timeout)?;
    if request_timeout.is_zero() {
        return Err(RefresherError::ConfigError(
            "[browser].request_timeout must be greater than zero".to_string(),
        ));
    }

    Ok(BrowserSettings {
        name: section.name.clone(),
        args: section.args.clone(),
        request_timeout,
    })
}

fn resolve_site(section: &SiteSection) -> Result<RefreshScript> {
    if section.profile_url.trim().is_empty() {
        return Err(RefresherError::ConfigError(
            "[site].profile_url must not be empty".to_string(),
        ));
    }

    Ok(RefreshScript {
        profile_url: section.profile_url.clone(),
        username_field: locator_field("[site].username_field", &section.username_field)?,
        password_field: locator_field("[site].password_field", &section.password_field)?,
        submit_button: locator_field("[site].submit_button", &section.submit_button)?,
        edit_control: locator_field("[site].edit_control", &section.edit_control)?,
        save_button: locator_field("[site].save_button", &section.save_button)?,
        settle_after_login: duration_field("[site].settle_after_login", &section.settle_after_login)?,
        settle_after_edit: duration_field("[site].settle_after_edit", &section.settle_after_edit)?,
    })
}

fn resolve_schedule(section: &ScheduleSection) -> Result<ScheduleSettings> {
    let triggers = section
        .triggers
        .iter()
        .map(|expr| Trigger::from_str(expr))
        .collect::<Result<Vec<_>>>()?;

    if triggers.is_empty() && !section.run_at_startup {
        return Err(RefresherError::ConfigError(
            "[schedule] has no triggers and run_at_startup = false; nothing would ever run"
                .to_string(),
        ));
    }

    Ok(ScheduleSettings {
        triggers,
        run_at_startup: section.run_at_startup,
        overlap: section.overlap,
    })
}

fn validate_credential_names(cfg: &RawConfigFile) -> Result<()> {
    let creds = &cfg.credentials;
    if creds.principal_env.trim().is_empty() || creds.credential_env.trim().is_empty() {
        return Err(RefresherError::ConfigError(
            "[credentials] variable names must not be empty".to_string(),
        ));
    }
    if creds.principal_env == creds.credential_env {
        return Err(RefresherError::ConfigError(format!(
            "[credentials] principal_env and credential_env both name '{}'",
            creds.principal_env
        )));
    }
    Ok(())
}

fn duration_field(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| RefresherError::ConfigError(format!("{field}: {e}")))
}

fn locator_field(field: &str, value: &str) -> Result<Locator> {
    Locator::from_str(value).map_err(|e| RefresherError::ConfigError(format!("{field}: {e}")))
}

fn leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
