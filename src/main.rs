// src/main.rs

use profile_refresher::{cli, logging, run};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("profile-refresher error: {err:?}");
        std::process::exit(1);
    }

    info!("profile-refresher starting up");

    // Run the application on its own task so a panic anywhere in startup is
    // caught here and reported once, instead of unwinding out of main. The
    // driver child is spawned with kill_on_drop, so unwinding cannot leak it.
    match tokio::spawn(run(args)).await {
        Ok(Ok(())) => info!("profile-refresher exiting"),
        Ok(Err(err)) => {
            error!(error = %err, "fatal error");
            std::process::exit(1);
        }
        Err(join_err) if join_err.is_panic() => {
            error!(error = %join_err, "application crashed");
            std::process::exit(1);
        }
        Err(join_err) => {
            error!(error = %join_err, "application task was cancelled");
            std::process::exit(1);
        }
    }
}
