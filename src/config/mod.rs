// src/config/mod.rs

//! Configuration loading and validation for goci.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate and convert raw values, e.g. duration strings (`validate.rs`).
//!
//! The config only parameterises the built-in pipeline; it never adds or
//! removes steps.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path, resolve_config, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, PushSection, RawConfigFile};
