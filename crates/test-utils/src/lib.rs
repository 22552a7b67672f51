//! Shared fixtures for the integration tests.
//!
//! - [`builders`]: `ConfigFileBuilder` on top of the built-in defaults.
//! - [`fake_session`]: an in-memory `SessionFactory` that records calls.
//! - [`mock_driver`]: a wiremock server answering `/status` and the
//!   WebDriver hub.

pub mod builders;
pub mod fake_session;
pub mod mock_driver;

use std::future::Future;
use std::net::TcpListener;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for any single test body.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Initialise tracing for tests.
///
/// Output goes through `with_test_writer()`, so it is only shown for
/// failing tests (or with `-- --nocapture`). Filter with `RUST_LOG`, e.g.
/// `RUST_LOG=profile_refresher=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future under [`TEST_TIMEOUT`], panicking if it does not finish.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test timed out after {TEST_TIMEOUT:?}"))
}

/// Poll `check` every 20ms until it returns true.
///
/// Meant to be raced against a timeout (see [`with_timeout`]) or used as a
/// shutdown future that resolves once some side effect has been observed.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    while !check().await {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// A localhost port with nothing listening on it.
///
/// The port is bound and released immediately, so connections to it are
/// refused (barring a race with another process grabbing it).
pub fn closed_local_port() -> u16 {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}
