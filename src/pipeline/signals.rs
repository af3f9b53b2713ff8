// src/pipeline/signals.rs

//! OS termination-signal listener for a single pipeline run.
//!
//! Only SIGINT and SIGTERM are intercepted. Anything else (SIGQUIT,
//! SIGHUP, ...) keeps the default OS disposition.

use std::future::Future;

use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

use crate::errors::{InterruptSignal, Result};

/// Register SIGINT and SIGTERM listeners and return a future that resolves
/// with whichever arrives first.
///
/// Registration happens before this function returns, so a signal sent
/// after the call is never missed. Dropping the future drops both
/// listeners. Note that once tokio has installed a handler for a signal it
/// stays installed for the life of the process; later deliveries with no
/// listener alive are ignored rather than terminating the process.
pub fn listen() -> Result<impl Future<Output = InterruptSignal> + Send + 'static> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    debug!("listening for SIGINT and SIGTERM");

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => InterruptSignal::Interrupt,
            _ = terminate.recv() => InterruptSignal::Terminate,
        }
    })
}
