// tests/config_loading.rs

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use profile_refresher::config::{load_and_validate, load_from_path, load_or_default};
use profile_refresher::errors::RefresherError;
use profile_refresher::types::OverlapPolicy;
use profile_refresher::webdriver::Locator;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

fn write(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("Refresher.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn empty_file_yields_the_stock_setup() -> TestResult {
    let dir = tempdir()?;
    let cfg = load_and_validate(write(dir.path(), ""))?;

    assert_eq!(cfg.driver.binary, "chromedriver");
    assert_eq!(cfg.driver.args, vec!["--port=9515"]);
    assert_eq!(cfg.driver.status_url(), "http://localhost:9515/status");
    assert_eq!(cfg.driver.readiness.attempts, 10);
    assert_eq!(cfg.driver.readiness.interval, Duration::from_millis(500));

    let exprs: Vec<&str> = cfg.schedule.triggers.iter().map(|t| t.expression()).collect();
    assert_eq!(exprs, vec!["0 9 * * *", "0 14 * * *", "0 18 * * *"]);
    assert!(cfg.schedule.run_at_startup);
    assert_eq!(cfg.schedule.overlap, OverlapPolicy::Allow);

    assert_eq!(cfg.script.profile_url, "https://www.naukri.com/mnjuser/profile");
    assert_eq!(cfg.script.username_field, Locator::Id("usernameField".into()));
    assert_eq!(cfg.script.password_field, Locator::Id("passwordField".into()));
    assert_eq!(cfg.script.settle_after_login, Duration::from_secs(5));
    assert_eq!(cfg.script.settle_after_edit, Duration::from_secs(2));

    assert_eq!(cfg.credentials.principal_env, "NAUKRI_USERNAME");
    assert_eq!(cfg.credentials.credential_env, "NAUKRI_PASSWORD");
    Ok(())
}

#[test]
fn every_section_can_be_overridden() -> TestResult {
    let dir = tempdir()?;
    let path = write(
        dir.path(),
        r#"
[driver]
binary = "/opt/drivers/chromedriver"
args = ["--port={port}", "--verbose"]
host = "127.0.0.1"
port = 4444
hub_path = "/"
readiness_attempts = 3
readiness_interval = "1s"

[browser]
args = ["--headless=new"]
request_timeout = "30s"

[site]
profile_url = "https://example.test/profile"
submit_button = "css:form button[type=submit]"
settle_after_login = "250ms"

[schedule]
triggers = ["30 8 * * MON-FRI", "0 0 12 * * *"]
run_at_startup = false
overlap = "skip"

[credentials]
principal_env = "SITE_USER"
credential_env = "SITE_PASS"
"#,
    );

    let cfg = load_and_validate(path)?;

    assert_eq!(cfg.driver.args, vec!["--port=4444", "--verbose"]);
    assert_eq!(cfg.driver.status_url(), "http://127.0.0.1:4444/status");
    assert_eq!(cfg.driver.hub_url(), "http://127.0.0.1:4444/");
    assert_eq!(cfg.driver.readiness.attempts, 3);
    assert_eq!(cfg.browser.request_timeout, Duration::from_secs(30));
    assert_eq!(
        cfg.browser.capabilities()["goog:chromeOptions"]["args"][0],
        "--headless=new"
    );
    assert_eq!(
        cfg.script.submit_button,
        Locator::Css("form button[type=submit]".into())
    );
    assert_eq!(cfg.script.settle_after_login, Duration::from_millis(250));
    assert_eq!(cfg.schedule.triggers.len(), 2);
    assert!(!cfg.schedule.run_at_startup);
    assert_eq!(cfg.schedule.overlap, OverlapPolicy::Skip);
    assert_eq!(cfg.credentials.principal_env, "SITE_USER");
    Ok(())
}

#[test]
fn invalid_trigger_is_rejected_with_its_expression() -> TestResult {
    let dir = tempdir()?;
    let path = write(dir.path(), "[schedule]\ntriggers = [\"0 25 * * *\"]\n");

    match load_and_validate(path) {
        Err(RefresherError::InvalidSchedule { expression, .. }) => {
            assert_eq!(expression, "0 25 * * *");
        }
        other => panic!("expected InvalidSchedule, got {other:?}"),
    }
    Ok(())
}

#[test]
fn wrong_field_count_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = write(dir.path(), "[schedule]\ntriggers = [\"9 * *\"]\n");

    assert!(matches!(
        load_and_validate(path),
        Err(RefresherError::InvalidSchedule { .. })
    ));
    Ok(())
}

#[test]
fn bad_values_are_config_errors() -> TestResult {
    let cases = [
        "[driver]\nreadiness_attempts = 0\n",
        "[driver]\nreadiness_interval = \"soon\"\n",
        "[driver]\nreadiness_interval = \"99999999999999999h\"\n",
        "[driver]\nport = 0\n",
        "[browser]\nrequest_timeout = \"0s\"\n",
        "[site]\nusername_field = \"usernameField\"\n",
        "[site]\nsave_button = \"name:save\"\n",
        "[schedule]\ntriggers = []\nrun_at_startup = false\n",
        "[credentials]\nprincipal_env = \"SAME\"\ncredential_env = \"SAME\"\n",
    ];

    for contents in cases {
        let dir = tempdir()?;
        let result = load_and_validate(write(dir.path(), contents));
        assert!(
            matches!(result, Err(RefresherError::ConfigError(_))),
            "{contents:?} gave {result:?}"
        );
    }
    Ok(())
}

#[test]
fn unknown_overlap_policy_fails_to_deserialize() -> TestResult {
    let dir = tempdir()?;
    let path = write(dir.path(), "[schedule]\noverlap = \"queue\"\n");

    assert!(matches!(
        load_from_path(path),
        Err(RefresherError::TomlError(_))
    ));
    Ok(())
}

#[test]
fn explicit_missing_path_is_an_io_error() -> TestResult {
    let dir = tempdir()?;
    let missing = dir.path().join("nope.toml");

    assert!(matches!(
        load_or_default(Some(&missing)),
        Err(RefresherError::IoError(_))
    ));
    Ok(())
}
