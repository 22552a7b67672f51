// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Resolve raw strings into triggers, durations and locators (`validate.rs`).
//! - Read the login secrets from the environment, after merging an optional
//!   `.env` file into it (`credentials.rs`).

pub mod credentials;
pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use credentials::{load_dotenv, load_dotenv_file, Credentials};
pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    BrowserSection, BrowserSettings, ConfigFile, CredentialsSection, DriverSection,
    RawConfigFile, ScheduleSection, ScheduleSettings, SiteSection,
};
