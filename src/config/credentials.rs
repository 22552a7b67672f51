// src/config/credentials.rs

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::CredentialsSection;
use crate::errors::{RefresherError, Result};

/// The principal/credential pair used to log in.
///
/// Loaded once at startup and cloned into the job closure. `Debug` is
/// redacted so the values cannot leak through `?credentials` in a log line.
#[derive(Clone)]
pub struct Credentials {
    principal: String,
    credential: String,
}

impl Credentials {
    pub fn new(principal: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            credential: credential.into(),
        }
    }

    /// Read both secrets from the process environment.
    pub fn from_env(section: &CredentialsSection) -> Result<Self> {
        Self::from_lookup(section, |name| std::env::var(name).ok())
    }

    /// Read both secrets through `lookup`; unset and empty are both missing.
    pub fn from_lookup<F>(section: &CredentialsSection, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| RefresherError::MissingCredential(name.to_string()))
        };

        let principal = fetch(&section.principal_env)?;
        let credential = fetch(&section.credential_env)?;
        Ok(Self {
            principal,
            credential,
        })
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

/// Merge `.env` from the working directory (or one of its parents) into
/// the process environment.
///
/// Variables that are already set win over the file. A missing file is
/// fine and yields `None`; a file that cannot be parsed is fatal.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => {
            debug!("no .env file found; using the process environment only");
            Ok(None)
        }
        Err(err) => Err(dotenv_error(".env", err)),
    }
}

/// Like [`load_dotenv`], for an explicit file. Returns whether it existed.
pub fn load_dotenv_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(dotenv_error(&path.display().to_string(), err)),
    }
}

// Parse errors quote the offending line; it may hold a secret.
fn dotenv_error(file: &str, err: dotenvy::Error) -> RefresherError {
    let reason = match err {
        dotenvy::Error::LineParse(_, index) => format!("syntax error at byte {index}"),
        other => other.to_string(),
    };
    RefresherError::ConfigError(format!("failed to load {file}: {reason}"))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("principal", &"<redacted>")
            .field("credential", &"<redacted>")
            .finish()
    }
}
