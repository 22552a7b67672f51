// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `profile-refresher`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "profile-refresher",
    version,
    about = "Keep a WebDriver driver alive and refresh a profile on a daily schedule.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Refresher.toml` in the current working directory if it
    /// exists, otherwise built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start the driver, perform a single refresh and exit.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REFRESHER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate config, print the schedule and upcoming fire times, but
    /// don't start anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_off() {
        let args = CliArgs::try_parse_from(["profile-refresher"]).unwrap();
        assert!(args.config.is_none());
        assert!(!args.once);
        assert!(!args.dry_run);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn parses_all_flags() {
        let args = CliArgs::try_parse_from([
            "profile-refresher",
            "--config",
            "cfg/Refresher.toml",
            "--once",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("cfg/Refresher.toml")));
        assert!(args.once);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
