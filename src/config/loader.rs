// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Name of the config file looked up inside the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "Goci.toml";

/// Load a configuration file and return the raw, unvalidated model.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    ConfigFile::try_from(raw_config)
}

/// Resolve the effective configuration for a run.
///
/// - An explicit path must exist and be valid.
/// - Otherwise `<project>/Goci.toml` is used if present.
/// - Otherwise built-in defaults apply.
pub fn resolve_config(explicit: Option<&Path>, project: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config from --config");
        return load_and_validate(path);
    }

    let candidate = default_config_path(project);
    if candidate.is_file() {
        debug!(path = %candidate.display(), "loading project config");
        return load_and_validate(&candidate);
    }

    debug!("no config file found; using defaults");
    Ok(ConfigFile::default())
}

pub fn default_config_path(project: &Path) -> PathBuf {
    project.join(DEFAULT_CONFIG_FILE)
}
