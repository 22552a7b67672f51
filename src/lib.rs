// src/lib.rs

pub mod automation;
pub mod cli;
pub mod config;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod schedule;
pub mod types;
pub mod webdriver;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::automation::RunOutcome;
use crate::cli::CliArgs;
use crate::config::{load_dotenv, load_or_default, ConfigFile, Credentials};
use crate::engine::{shutdown_signal, Runtime};
use crate::errors::Result;
use crate::schedule::next_due;

/// High-level entry point used by `main.rs`.
///
/// This wires together, in order:
/// - config loading
/// - `.env` loading, then credentials (checked before the driver is ever
///   spawned)
/// - driver start + readiness
/// - scheduler + immediate run
/// - SIGINT/SIGTERM handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    if let Some(path) = load_dotenv()? {
        info!(path = %path.display(), "loaded environment file");
    }
    let credentials = Credentials::from_env(&cfg.credentials)?;
    info!("credentials loaded");

    let mut runtime = Runtime::new(cfg, credentials);

    if args.once {
        match runtime.run_once(shutdown_signal()).await? {
            Some(RunOutcome::Completed) => info!("single run completed"),
            Some(outcome) => warn!(?outcome, "single run did not complete"),
            None => info!("shut down before the run started"),
        }
        return Ok(());
    }

    runtime.run_until(shutdown_signal()).await
}

/// Dry-run output: resolved driver, schedule and the next fire times.
fn print_dry_run(cfg: &ConfigFile) {
    println!("profile-refresher dry-run");
    println!("  driver: {} {}", cfg.driver.binary, cfg.driver.args.join(" "));
    println!("  status: {}", cfg.driver.status_url());
    println!("  hub:    {}", cfg.driver.hub_url());
    println!(
        "  readiness: {} attempts, {:?} apart",
        cfg.driver.readiness.attempts, cfg.driver.readiness.interval
    );
    println!("  profile: {}", cfg.script.profile_url);
    println!(
        "  credentials from: ${} / ${}",
        cfg.credentials.principal_env, cfg.credentials.credential_env
    );
    println!();

    println!("schedule ({} triggers):", cfg.schedule.triggers.len());
    for trigger in &cfg.schedule.triggers {
        println!("  - {trigger}");
    }
    println!("  run_at_startup: {}", cfg.schedule.run_at_startup);
    println!("  overlap: {:?}", cfg.schedule.overlap);
    println!();

    println!("upcoming fires (local time):");
    let mut cursor = Local::now();
    for _ in 0..5 {
        let Some((when, due)) = next_due(&cfg.schedule.triggers, &cursor) else {
            println!("  (none)");
            break;
        };
        let names: Vec<&str> = due.iter().map(|t| t.expression()).collect();
        println!("  {} <- {}", when.format("%Y-%m-%d %H:%M:%S"), names.join(", "));
        cursor = when;
    }

    debug!("dry-run complete (nothing started)");
}
