// src/pipeline/mod.rs

//! Sequential build pipeline.
//!
//! - [`step`] defines `Step` and its closed set of kinds (plain,
//!   output-validating, timeout-bound).
//! - [`runner`] owns the `Pipeline` type and the `Runner` that executes it
//!   on a background task while waiting for failure, completion or a signal.
//! - [`signals`] registers the SIGINT / SIGTERM listener for a run.
//! - [`canonical`] builds the standard Go build/test/fmt/push pipeline.

pub mod canonical;
pub mod runner;
pub mod signals;
pub mod step;

pub use canonical::{canonical_pipeline, BUILD_STEP, FORMAT_STEP, PUSH_STEP, TEST_STEP};
pub use runner::{Pipeline, PipelineEvent, RunOutcome, Runner};
pub use step::{Step, StepKind, DEFAULT_STEP_TIMEOUT};
