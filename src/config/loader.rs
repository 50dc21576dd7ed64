// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::Config;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw `Config`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (time-span sanity, role references, etc.). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and run semantic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + default functions).
/// - Checks for:
///   - a sane analysis time span,
///   - stage roles without an `[executable.*]` section,
///   - malformed site segment pairs.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Segflow.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Segflow.toml")
}
