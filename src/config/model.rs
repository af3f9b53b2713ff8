// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from `Goci.toml`, before validation.
///
/// ```toml
/// [push]
/// remote = "origin"
/// branch = "master"
/// timeout = "10s"
/// ```
///
/// Every key is optional; defaults match the canonical pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub push: PushSection,
}

/// `[push]` section, parameters of the `git push` step.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushSection {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Deadline for the push, e.g. `"10s"`.
    #[serde(default = "default_push_timeout")]
    pub timeout: String,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_push_timeout() -> String {
    "10s".to_string()
}

impl Default for PushSection {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            branch: default_branch(),
            timeout: default_push_timeout(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`], so the timeout is always parsed and non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    remote: String,
    branch: String,
    push_timeout: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(remote: String, branch: String, push_timeout: Duration) -> Self {
        Self {
            remote,
            branch,
            push_timeout,
        }
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn push_timeout(&self) -> Duration {
        self.push_timeout
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(default_remote(), default_branch(), Duration::from_secs(10))
    }
}
