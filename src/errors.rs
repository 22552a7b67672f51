// src/errors.rs

//! Crate-wide error types.
//!
//! [`RefresherError`] is the fatal tier: anything that surfaces here stops
//! the process. Failures inside a single automation run use
//! [`crate::webdriver::WebDriverError`] and never reach this type.

use thiserror::Error;

use crate::webdriver::WebDriverError;

#[derive(Error, Debug)]
pub enum RefresherError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid schedule expression '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("Missing credential: environment variable {0} is unset or empty")]
    MissingCredential(String),

    #[error("Failed to spawn driver '{binary}': {source}")]
    DriverSpawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Driver at {url} did not become ready after {attempts} attempts")]
    DriverNotReady { url: String, attempts: u32 },

    #[error(transparent)]
    WebDriver(#[from] WebDriverError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RefresherError>;
