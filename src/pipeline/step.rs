// src/pipeline/step.rs

//! A single pipeline step: one external command plus its success rule.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{ExitCode, StepCause, StepError};
use crate::exec::{CommandSpec, ProcessLauncher, ProcessOutput};

/// Timeout applied to timeout-bound steps constructed without one.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

/// How a step decides whether it succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Exit status zero.
    Plain,
    /// Exit status zero *and* nothing written to stdout.
    OutputValidating,
    /// Exit status zero within the given duration.
    Timeout(Duration),
}

/// One unit of work in a pipeline. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    name: String,
    program: String,
    args: Vec<String>,
    dir: PathBuf,
    message: String,
    kind: StepKind,
}

impl Step {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: &[&str],
        dir: impl AsRef<Path>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            dir: dir.as_ref().to_path_buf(),
            message: message.into(),
            kind: StepKind::Plain,
        }
    }

    /// A step that fails if the command prints anything on stdout.
    pub fn output_validating(
        name: impl Into<String>,
        program: impl Into<String>,
        args: &[&str],
        dir: impl AsRef<Path>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: StepKind::OutputValidating,
            ..Self::new(name, program, args, dir, message)
        }
    }

    /// A step bounded by `timeout`. `None` or a zero duration falls back to
    /// [`DEFAULT_STEP_TIMEOUT`].
    pub fn with_timeout(
        name: impl Into<String>,
        program: impl Into<String>,
        args: &[&str],
        dir: impl AsRef<Path>,
        message: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let timeout = timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(DEFAULT_STEP_TIMEOUT);
        Self {
            kind: StepKind::Timeout(timeout),
            ..Self::new(name, program, args, dir, message)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// The deadline for timeout-bound steps.
    pub fn timeout(&self) -> Option<Duration> {
        match self.kind {
            StepKind::Timeout(t) => Some(t),
            _ => None,
        }
    }

    fn command_spec(&self) -> CommandSpec {
        CommandSpec {
            program: self.program.clone(),
            args: self.args.clone(),
            dir: self.dir.clone(),
            capture_stdout: self.kind == StepKind::OutputValidating,
        }
    }

    /// Run the step's command once and classify the outcome.
    ///
    /// Returns the success message, or a [`StepError`] attributed to this
    /// step. Spawns exactly one process per call; nothing is retried.
    pub async fn execute(&self, launcher: &dyn ProcessLauncher) -> Result<String, StepError> {
        self.execute_cancellable(launcher, CancellationToken::new())
            .await
    }

    /// Like [`Step::execute`], but `cancel` stops the process early.
    ///
    /// Once this returns the step's process has exited, whether it finished,
    /// timed out or was cancelled.
    pub async fn execute_cancellable(
        &self,
        launcher: &dyn ProcessLauncher,
        cancel: CancellationToken,
    ) -> Result<String, StepError> {
        debug!(step = %self.name, kind = ?self.kind, "executing step");

        let output = match self.kind {
            StepKind::Timeout(timeout) => {
                let deadline = cancel.child_token();
                let mut launch = launcher.launch(self.command_spec(), deadline.clone());

                match tokio::time::timeout(timeout, &mut launch).await {
                    Ok(res) => res,
                    Err(_) => {
                        warn!(
                            step = %self.name,
                            timeout_ms = timeout.as_millis() as u64,
                            "step timed out"
                        );
                        // Kill the process and wait until it is gone.
                        deadline.cancel();
                        let _ = launch.await;
                        return Err(StepError::timed_out(&self.name));
                    }
                }
            }
            StepKind::Plain | StepKind::OutputValidating => {
                launcher.launch(self.command_spec(), cancel).await
            }
        };

        let output = self.check_exit(output)?;

        if self.kind == StepKind::OutputValidating && !output.stdout.is_empty() {
            return Err(StepError::format_violation(&self.name, &output.stdout));
        }

        info!(step = %self.name, "step succeeded");
        Ok(self.message.clone())
    }

    fn check_exit(&self, output: std::io::Result<ProcessOutput>) -> Result<ProcessOutput, StepError> {
        match output {
            Ok(out) if out.success() => Ok(out),
            Ok(out) => Err(StepError::execution(
                &self.name,
                StepCause::Exit(ExitCode(out.code)),
            )),
            Err(e) => Err(StepError::execution(&self.name, StepCause::Launch(e))),
        }
    }
}
