// src/pipeline/runner.rs

use std::fmt;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{GociError, InterruptSignal, Result, StepError};
use crate::exec::{ProcessLauncher, RealProcessLauncher};

use super::signals;
use super::step::Step;

/// Ordered, fixed sequence of steps for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Events sent from the background worker to the control loop.
#[derive(Debug)]
pub enum PipelineEvent {
    StepSucceeded { step: String, message: String },
    StepFailed(StepError),
    Completed,
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed,
    Interrupted,
}

impl RunOutcome {
    fn of(res: &Result<()>) -> Self {
        match res {
            Ok(()) => RunOutcome::Succeeded,
            Err(GociError::Signal(_)) => RunOutcome::Interrupted,
            Err(_) => RunOutcome::Failed,
        }
    }
}

/// Owns the background worker for one run.
///
/// [`WorkerGuard::stop`] cancels the in-flight step and waits for the worker,
/// so its process has been killed and reaped when `stop` returns. If the
/// guard is dropped instead (the run future was cancelled or panicked), the
/// worker is cancelled and aborted without waiting; `kill_on_drop` still
/// stops the process.
struct WorkerGuard {
    handle: Option<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl WorkerGuard {
    fn spawn<F>(cancel: CancellationToken, worker: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(worker)),
            cancel,
        }
    }

    async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    warn!("pipeline worker panicked");
                }
            }
        }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Drives a [`Pipeline`] one step at a time.
///
/// Steps run on a background task; the caller's task waits for the first
/// of: a step failure, pipeline completion, or a termination signal.
pub struct Runner {
    pipeline: Pipeline,
    launcher: Arc<dyn ProcessLauncher>,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl Runner {
    /// Runner that launches real OS processes.
    pub fn new(pipeline: Pipeline) -> Self {
        Self::with_launcher(pipeline, Arc::new(RealProcessLauncher))
    }

    pub fn with_launcher(pipeline: Pipeline, launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self { pipeline, launcher }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run the pipeline, interruptible by SIGINT / SIGTERM.
    pub async fn run<W: Write>(self, out: &mut W) -> Result<()> {
        let shutdown = signals::listen()?;
        self.run_until(out, shutdown).await
    }

    /// Run the pipeline, interruptible by `shutdown`.
    ///
    /// Each success message is written to `out` followed by a newline, in
    /// step order, as soon as that step finishes. If `shutdown` resolves
    /// first, the in-flight step's process is killed and [`GociError::Signal`]
    /// is returned once it has exited.
    pub async fn run_until<W, S>(self, out: &mut W, shutdown: S) -> Result<()>
    where
        W: Write,
        S: Future<Output = InterruptSignal>,
    {
        info!(steps = self.pipeline.len(), "pipeline started");

        let (tx, rx) = mpsc::channel::<PipelineEvent>(16);
        let cancel = CancellationToken::new();
        let worker = WorkerGuard::spawn(
            cancel.clone(),
            execute_steps(self.pipeline.steps, self.launcher, cancel, tx),
        );

        let res = wait_for_outcome(rx, out, shutdown).await;
        worker.stop().await;

        info!(outcome = ?RunOutcome::of(&res), "pipeline finished");
        res
    }
}

/// Control loop: write successes, return on failure, completion or signal.
async fn wait_for_outcome<W, S>(
    mut rx: mpsc::Receiver<PipelineEvent>,
    out: &mut W,
    shutdown: S,
) -> Result<()>
where
    W: Write,
    S: Future<Output = InterruptSignal>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            sig = &mut shutdown => {
                warn!(signal = %sig, "received termination signal; abandoning in-flight step");
                return Err(GociError::Signal(sig));
            }
            event = rx.recv() => {
                match event {
                    Some(PipelineEvent::StepSucceeded { step, message }) => {
                        debug!(step = %step, "writing success message");
                        writeln!(out, "{message}")?;
                        out.flush()?;
                    }
                    Some(PipelineEvent::StepFailed(err)) => return Err(err.into()),
                    Some(PipelineEvent::Completed) => return Ok(()),
                    None => {
                        // Only reachable if the worker panicked.
                        return Err(GociError::IoError(std::io::Error::other(
                            "pipeline worker stopped unexpectedly",
                        )));
                    }
                }
            }
        }
    }
}

/// Background worker: runs steps strictly in order, stopping at the first
/// failure.
async fn execute_steps(
    steps: Vec<Step>,
    launcher: Arc<dyn ProcessLauncher>,
    cancel: CancellationToken,
    tx: mpsc::Sender<PipelineEvent>,
) {
    for step in steps {
        if cancel.is_cancelled() {
            debug!(step = %step.name(), "run cancelled; not starting step");
            return;
        }

        let event = match step
            .execute_cancellable(launcher.as_ref(), cancel.clone())
            .await
        {
            Ok(message) => PipelineEvent::StepSucceeded {
                step: step.name().to_string(),
                message,
            },
            Err(err) => {
                let _ = tx.send(PipelineEvent::StepFailed(err)).await;
                return;
            }
        };

        if tx.send(event).await.is_err() {
            debug!("runner stopped listening; worker exiting");
            return;
        }
    }

    let _ = tx.send(PipelineEvent::Completed).await;
}
