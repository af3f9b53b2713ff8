#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use goci::pipeline::{Pipeline, Step};

/// Builder for `Pipeline` to simplify test setup.
///
/// Every step runs in the same directory; the program name doubles as the
/// key for `FakeLauncher` behaviours.
pub struct PipelineBuilder {
    dir: PathBuf,
    steps: Vec<Step>,
}

impl PipelineBuilder {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, name: &str, program: &str, message: &str) -> Self {
        self.steps.push(Step::new(name, program, &[], &self.dir, message));
        self
    }

    pub fn output_validating(mut self, name: &str, program: &str, message: &str) -> Self {
        self.steps
            .push(Step::output_validating(name, program, &[], &self.dir, message));
        self
    }

    pub fn with_timeout(
        mut self,
        name: &str,
        program: &str,
        message: &str,
        timeout: Option<Duration>,
    ) -> Self {
        self.steps
            .push(Step::with_timeout(name, program, &[], &self.dir, message, timeout));
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline::new(self.steps)
    }
}
