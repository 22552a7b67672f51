// src/logging.rs

//! Logging setup on `tracing-subscriber`.
//!
//! The filter is resolved as:
//! 1. `--log-level` on the command line;
//! 2. `REFRESHER_LOG`, either a bare level (`"debug"`) or full filter
//!    directives (`"debug,hyper=info"`);
//! 3. `info`.
//!
//! A bare level applies to this crate only. The HTTP stack underneath the
//! WebDriver client (`reqwest`, `hyper`) stays at `warn` unless a directive
//! names it, since every driver command would otherwise log several lines.
//!
//! Output goes to stderr; the driver subprocess shares our stdout.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "REFRESHER_LOG";

const QUIET_DEPS: &[&str] = &["reqwest=warn", "hyper=warn", "hyper_util=warn", "rustls=warn"];

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(cli_level, env_value.as_deref());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter '{directives}'"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}

/// Build the `EnvFilter` directive string for the given inputs.
fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return scoped(level_from_log_level(level));
    }

    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => match parse_level_str(raw) {
            Some(level) => scoped(level),
            // Anything that is not a bare level is taken as directives.
            None => raw.to_string(),
        },
        None => scoped(Level::INFO),
    }
}

fn scoped(level: Level) -> String {
    let mut directives = vec![level.as_str().to_lowercase()];
    directives.extend(QUIET_DEPS.iter().map(|d| d.to_string()));
    directives.join(",")
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_level_strings_are_lenient() {
        assert_eq!(parse_level_str(" WARNING "), Some(Level::WARN));
        assert_eq!(parse_level_str("trace"), Some(Level::TRACE));
        assert_eq!(parse_level_str("loud"), None);
    }

    #[test]
    fn cli_flag_wins_over_env() {
        let d = filter_directives(Some(LogLevel::Debug), Some("error"));
        assert!(d.starts_with("debug,"));
        assert!(d.contains("hyper=warn"));
    }

    #[test]
    fn bare_env_level_keeps_http_stack_quiet() {
        assert!(filter_directives(None, Some("trace")).starts_with("trace,reqwest=warn"));
        assert!(filter_directives(None, None).starts_with("info,"));
        assert!(filter_directives(None, Some("  ")).starts_with("info,"));
    }

    #[test]
    fn env_directives_pass_through() {
        assert_eq!(
            filter_directives(None, Some("profile_refresher=debug,hyper=info")),
            "profile_refresher=debug,hyper=info"
        );
        assert!(EnvFilter::try_new(filter_directives(None, Some("warn"))).is_ok());
    }
}
