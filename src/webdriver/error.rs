// src/webdriver/error.rs

use thiserror::Error;

/// Anything that can go wrong while talking to the driver endpoint.
///
/// No distinction is drawn between transient and permanent failures: a
/// refused connection and a selector that no longer matches both abort the
/// current run the same way.
#[derive(Error, Debug)]
pub enum WebDriverError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("WebDriver command failed (HTTP {status}): {error}: {message}")]
    Command {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Malformed WebDriver response: {0}")]
    Malformed(String),
}

impl WebDriverError {
    /// Shorthand for the error a driver returns when a lookup matches nothing.
    pub fn no_such_element(selector: impl Into<String>) -> Self {
        WebDriverError::Command {
            status: 404,
            error: "no such element".to_string(),
            message: format!("unable to locate element: {}", selector.into()),
        }
    }

    /// The W3C error code (e.g. `"no such element"`), if the driver sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            WebDriverError::Command { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }
}
