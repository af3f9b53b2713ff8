// src/pipeline/canonical.rs

//! The built-in build / test / format / push pipeline for a Go project.

use std::path::Path;

use crate::config::ConfigFile;

use super::runner::Pipeline;
use super::step::Step;

pub const BUILD_STEP: &str = "go build";
pub const TEST_STEP: &str = "go test";
pub const FORMAT_STEP: &str = "go fmt";
pub const PUSH_STEP: &str = "git push";

/// Build the four-step pipeline for `project`.
///
/// `go build` also builds the standard `errors` package so that building
/// several packages at once discards the output binary.
pub fn canonical_pipeline(project: &Path, cfg: &ConfigFile) -> Pipeline {
    Pipeline::new(vec![
        Step::new(
            BUILD_STEP,
            "go",
            &["build", ".", "errors"],
            project,
            "Go Build: SUCCESS",
        ),
        Step::new(TEST_STEP, "go", &["test", "-v"], project, "Go Test: SUCCESS"),
        Step::output_validating(FORMAT_STEP, "gofmt", &["-l", "."], project, "Gofmt: SUCCESS"),
        Step::with_timeout(
            PUSH_STEP,
            "git",
            &["push", cfg.remote(), cfg.branch()],
            project,
            "Git Push: SUCCESS",
            Some(cfg.push_timeout()),
        ),
    ])
}
