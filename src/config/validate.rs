// src/config/validate.rs

use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{GociError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = GociError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_non_empty("[push].remote", &raw.push.remote)?;
        validate_non_empty("[push].branch", &raw.push.branch)?;
        let push_timeout = validate_timeout("[push].timeout", &raw.push.timeout)?;

        Ok(ConfigFile::new_unchecked(
            raw.push.remote,
            raw.push.branch,
            push_timeout,
        ))
    }
}

fn validate_timeout(field: &str, value: &str) -> Result<Duration> {
    let duration = parse_duration(value)
        .map_err(|e| GociError::ConfigError(format!("{field}: {e}")))?;

    if duration.is_zero() {
        return Err(GociError::ConfigError(format!(
            "{field} must be greater than zero (got \"{value}\")"
        )));
    }
    Ok(duration)
}

fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GociError::ConfigError(format!("{field} must not be empty")));
    }
    Ok(())
}
