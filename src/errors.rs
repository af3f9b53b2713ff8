// src/errors.rs

//! Crate-wide error types.
//!
//! - [`StepError`] is attributed to a single pipeline step and carries an
//!   optional [`StepCause`]. Two step errors belong to the same class when
//!   their step identifiers match; the message and cause are not compared.
//! - [`GociError`] is what the top-level entry points return: validation
//!   failures, step failures, signal interruptions and config/IO problems.

use std::fmt;
use std::io;

use thiserror::Error;

/// Marker cause for a bounded operation that did not finish in time.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

/// Exit code of a finished child process.
///
/// `None` means the process was terminated by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit status {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// The underlying reason a step failed.
#[derive(Error, Debug)]
pub enum StepCause {
    /// The process could not be started or waited on.
    #[error(transparent)]
    Launch(#[from] io::Error),

    #[error("{0}")]
    Exit(ExitCode),

    #[error("{0}")]
    DeadlineExceeded(#[from] DeadlineExceeded),
}

/// Classification of a [`StepError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepErrorKind {
    /// The process could not be started or exited non-zero.
    Execution,
    /// An output-validating step saw text on stdout.
    FormatViolation,
    /// A timeout-bound step did not finish before its deadline.
    Timeout,
}

/// Error attributed to one pipeline step.
#[derive(Error, Debug)]
#[error("Step: {step:?}: {message}{}", fmt_cause(.cause))]
pub struct StepError {
    kind: StepErrorKind,
    step: String,
    message: String,
    #[source]
    cause: Option<StepCause>,
}

fn fmt_cause(cause: &Option<StepCause>) -> String {
    match cause {
        Some(cause) => format!(": Cause: {cause}"),
        None => String::new(),
    }
}

impl StepError {
    /// Process failed to start or exited unsuccessfully.
    pub fn execution(step: impl Into<String>, cause: StepCause) -> Self {
        Self {
            kind: StepErrorKind::Execution,
            step: step.into(),
            message: "failed to execute".to_string(),
            cause: Some(cause),
        }
    }

    /// Output-validating step captured stdout text.
    pub fn format_violation(step: impl Into<String>, output: &str) -> Self {
        Self {
            kind: StepErrorKind::FormatViolation,
            step: step.into(),
            message: format!("invalid format: {output}"),
            cause: None,
        }
    }

    /// Timeout-bound step hit its deadline.
    pub fn timed_out(step: impl Into<String>) -> Self {
        Self {
            kind: StepErrorKind::Timeout,
            step: step.into(),
            message: "failed time out".to_string(),
            cause: Some(StepCause::DeadlineExceeded(DeadlineExceeded)),
        }
    }

    pub fn kind(&self) -> StepErrorKind {
        self.kind
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&StepCause> {
        self.cause.as_ref()
    }

    /// True if this error is attributed to the step called `name`.
    pub fn is_step(&self, name: &str) -> bool {
        self.step == name
    }

    /// Same error class: both errors are attributed to the same step.
    pub fn same_step(&self, other: &StepError) -> bool {
        self.step == other.step
    }

    /// True when the cause is the deadline-exceeded marker.
    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, Some(StepCause::DeadlineExceeded(_)))
    }
}

/// Termination signals the runner intercepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for InterruptSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptSignal::Interrupt => f.write_str("SIGINT"),
            InterruptSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GociError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error("received signal: {0}")]
    Signal(InterruptSignal),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl GociError {
    /// The step error inside, if this is a step failure.
    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            GociError::Step(err) => Some(err),
            _ => None,
        }
    }

    /// The intercepted signal, if the run was interrupted.
    pub fn signal(&self) -> Option<InterruptSignal> {
        match self {
            GociError::Signal(sig) => Some(*sig),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GociError>;
