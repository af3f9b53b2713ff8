// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] provides the `ProcessLauncher` trait, the `CommandSpec` /
//!   `ProcessOutput` types passed across it, and the `RealProcessLauncher`
//!   used in production. Launches take a `CancellationToken` so callers can
//!   stop a process and know it is gone once the launch resolves.

pub mod launcher;

pub use launcher::{
    cancelled_error, CommandSpec, LaunchFuture, ProcessLauncher, ProcessOutput, RealProcessLauncher,
};
