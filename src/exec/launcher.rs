// src/exec/launcher.rs

//! Pluggable process launcher.
//!
//! Steps never spawn processes themselves; they hand a [`CommandSpec`] to a
//! [`ProcessLauncher`]. Production code uses [`RealProcessLauncher`]; tests
//! swap in a fake that scripts outcomes without touching the OS.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything needed to start one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    /// Capture stdout into [`ProcessOutput::stdout`] instead of discarding it.
    pub capture_stdout: bool,
}

/// Result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout (empty unless `capture_stdout` was set).
    pub stdout: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Boxed future returned by [`ProcessLauncher::launch`].
pub type LaunchFuture<'a> = Pin<Box<dyn Future<Output = io::Result<ProcessOutput>> + Send + 'a>>;

/// Trait abstracting how external commands are started and awaited.
///
/// When `cancel` fires, the launcher must stop the process and wait for it
/// to exit before resolving with an `ErrorKind::Interrupted` error.
/// Dropping the future early must still stop the process, just without
/// waiting for it.
pub trait ProcessLauncher: Send + Sync + fmt::Debug {
    /// Start the command and wait for it to exit.
    ///
    /// `Err` means the process could not be started, waited on, or was
    /// cancelled; a non-zero exit is reported through
    /// [`ProcessOutput::code`].
    fn launch(&self, spec: CommandSpec, cancel: CancellationToken) -> LaunchFuture<'_>;
}

/// Error returned by launchers whose process was stopped through the
/// cancellation token.
pub fn cancelled_error() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "process cancelled")
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Launcher backed by `tokio::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessLauncher;

impl ProcessLauncher for RealProcessLauncher {
    fn launch(&self, spec: CommandSpec, cancel: CancellationToken) -> LaunchFuture<'_> {
        Box::pin(async move {
            info!(
                program = %spec.program,
                args = ?spec.args,
                dir = %spec.dir.display(),
                "starting process"
            );

            let mut cmd = Command::new(&spec.program);
            cmd.args(&spec.args)
                .current_dir(&spec.dir)
                .stdin(Stdio::null())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            if spec.capture_stdout {
                cmd.stdout(Stdio::piped());
            } else {
                cmd.stdout(Stdio::null());
            }

            let mut child = cmd.spawn()?;
            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            // Either the process exits on its own, or cancellation kills it
            // and waits for it to be reaped.
            let (status, stdout, stderr) = tokio::select! {
                res = async { tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr)) } => res?,
                _ = cancel.cancelled() => {
                    warn!(program = %spec.program, "cancellation requested; killing process");
                    child.kill().await?;
                    return Err(cancelled_error());
                }
            };

            for line in String::from_utf8_lossy(&stderr).lines() {
                debug!(program = %spec.program, "stderr: {}", line);
            }

            let code = status.code();
            info!(
                program = %spec.program,
                exit_code = ?code,
                success = status.success(),
                "process exited"
            );

            Ok(ProcessOutput {
                code,
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
            })
        })
    }
}
