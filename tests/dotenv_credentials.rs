// tests/dotenv_credentials.rs

use std::error::Error;
use std::fs;

use profile_refresher::config::{load_dotenv_file, Credentials, CredentialsSection};
use profile_refresher::errors::RefresherError;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

// Each test uses its own variable names: the process environment is shared
// by every test in this binary.
fn section(user: &str, pass: &str) -> CredentialsSection {
    CredentialsSection {
        principal_env: user.to_string(),
        credential_env: pass.to_string(),
    }
}

#[test]
fn env_file_supplies_the_credentials() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "# login for the refresher\n\
         DOTENV_TEST_FILE_USER=jane@example.com\n\
         DOTENV_TEST_FILE_PASS=\"correct horse\"\n",
    )?;

    assert!(load_dotenv_file(&path)?);

    let creds = Credentials::from_env(&section("DOTENV_TEST_FILE_USER", "DOTENV_TEST_FILE_PASS"))?;
    assert_eq!(creds.principal(), "jane@example.com");
    assert_eq!(creds.credential(), "correct horse");
    Ok(())
}

#[test]
fn missing_env_file_is_not_an_error() -> TestResult {
    let dir = tempdir()?;

    assert!(!load_dotenv_file(&dir.path().join(".env"))?);

    let missing =
        Credentials::from_env(&section("DOTENV_TEST_ABSENT_USER", "DOTENV_TEST_ABSENT_PASS"));
    assert!(matches!(
        missing,
        Err(RefresherError::MissingCredential(ref name)) if name == "DOTENV_TEST_ABSENT_USER"
    ));
    Ok(())
}

#[test]
fn malformed_env_file_is_fatal_without_echoing_it() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join(".env");
    fs::write(&path, "DOTENV_TEST_BAD_USER=jane\nthis line leaks hunter2\n")?;

    match load_dotenv_file(&path) {
        Err(RefresherError::ConfigError(msg)) => {
            assert!(msg.contains(".env"), "{msg}");
            assert!(!msg.contains("hunter2"), "{msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
    Ok(())
}
