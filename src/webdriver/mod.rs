// src/webdriver/mod.rs

//! Minimal W3C WebDriver client.
//!
//! Only the handful of commands the automation runner needs are exposed:
//! new session, navigate, find element, send keys, click and delete
//! session. Both W3C and legacy (JSON wire) response shapes are accepted so
//! the client works against driver builds that still answer in the old
//! format.
//!
//! - [`client`] owns the HTTP plumbing and the session/element commands.
//! - [`locator`] parses the `id:` / `css:` / `xpath:` selector strings used
//!   in configuration.
//! - [`error`] defines [`WebDriverError`], the run-local error tier.

pub mod client;
pub mod error;
pub mod locator;

pub use client::{ElementRef, RemoteSession, WebDriverClient};
pub use error::WebDriverError;
pub use locator::Locator;
