use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use goci::exec::{cancelled_error, CommandSpec, LaunchFuture, ProcessLauncher, ProcessOutput};
use tokio_util::sync::CancellationToken;

/// Scripted outcome for one program.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Exit 0 with no output.
    Succeed,
    /// Exit with the given non-zero code.
    Fail(i32),
    /// Exit 0 after printing `text` on stdout.
    Print(String),
    /// Never finish.
    Hang,
    /// Cannot be started at all.
    SpawnError,
    /// Sleep, then behave as the inner behaviour.
    Delay(Duration, Box<Behaviour>),
}

/// A fake launcher that:
/// - records every command it was asked to launch
/// - resolves each launch according to the behaviour scripted for its
///   program (default: `Succeed`).
///
/// Hung or delayed launches are plain tokio sleeps. Cancelling the token
/// ends them with an `Interrupted` error and records the program as
/// cancelled, mirroring a real child being killed and reaped.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    behaviours: Arc<Mutex<HashMap<String, Behaviour>>>,
    launched: Arc<Mutex<Vec<CommandSpec>>>,
    finished: Arc<Mutex<Vec<String>>>,
    cancelled: Arc<Mutex<Vec<String>>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the behaviour for `program`.
    pub fn on(self, program: &str, behaviour: Behaviour) -> Self {
        self.behaviours
            .lock()
            .unwrap()
            .insert(program.to_string(), behaviour);
        self
    }

    /// Every command launched so far, in order.
    pub fn launched(&self) -> Vec<CommandSpec> {
        self.launched.lock().unwrap().clone()
    }

    /// Programs launched so far, in order.
    pub fn launched_programs(&self) -> Vec<String> {
        self.launched().into_iter().map(|c| c.program).collect()
    }

    /// Programs whose simulated process ran to the end (not dropped early).
    pub fn finished_programs(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    /// Programs stopped through the cancellation token.
    pub fn cancelled_programs(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

async fn resolve(behaviour: Behaviour, capture_stdout: bool) -> io::Result<ProcessOutput> {
    let mut behaviour = behaviour;
    loop {
        match behaviour {
            Behaviour::Succeed => return Ok(ProcessOutput { code: Some(0), stdout: String::new() }),
            Behaviour::Fail(code) => return Ok(ProcessOutput { code: Some(code), stdout: String::new() }),
            Behaviour::Print(text) => {
                let stdout = if capture_stdout { text } else { String::new() };
                return Ok(ProcessOutput { code: Some(0), stdout });
            }
            Behaviour::Hang => std::future::pending::<()>().await,
            Behaviour::SpawnError => {
                return Err(io::Error::new(io::ErrorKind::NotFound, "executable file not found"));
            }
            Behaviour::Delay(d, next) => {
                tokio::time::sleep(d).await;
                behaviour = *next;
            }
        }
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, spec: CommandSpec, cancel: CancellationToken) -> LaunchFuture<'_> {
        let behaviour = self
            .behaviours
            .lock()
            .unwrap()
            .get(&spec.program)
            .cloned()
            .unwrap_or(Behaviour::Succeed);
        self.launched.lock().unwrap().push(spec.clone());

        let finished = Arc::clone(&self.finished);
        let cancelled = Arc::clone(&self.cancelled);
        Box::pin(async move {
            tokio::select! {
                res = resolve(behaviour, spec.capture_stdout) => {
                    finished.lock().unwrap().push(spec.program);
                    res
                }
                _ = cancel.cancelled() => {
                    cancelled.lock().unwrap().push(spec.program);
                    Err(cancelled_error())
                }
            }
        })
    }
}
