// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** parse triggers,
/// durations or locators. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the effective configuration.
///
/// - An explicit path must exist and parse.
/// - Without one, [`default_config_path`] is used if present; otherwise the
///   built-in defaults apply.
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading config");
        return load_and_validate(path);
    }

    let fallback = default_config_path();
    if fallback.is_file() {
        info!(path = %fallback.display(), "loading config");
        load_and_validate(&fallback)
    } else {
        debug!(path = %fallback.display(), "no config file found; using built-in defaults");
        ConfigFile::try_from(RawConfigFile::default())
    }
}

/// `Refresher.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Refresher.toml")
}
