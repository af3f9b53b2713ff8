// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `goci`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "goci",
    version,
    about = "Build, test, format-check and push a Go project, one step at a time.",
    long_about = None
)]
pub struct CliArgs {
    /// Project directory the pipeline runs in.
    #[arg(short = 'p', long, value_name = "DIR", default_value = "")]
    pub project: String,

    /// Path to a config file (TOML).
    ///
    /// If omitted, `Goci.toml` inside the project directory is used when it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GOCI_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved pipeline without running any commands.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
