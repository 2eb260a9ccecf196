//! Run loop: initial pass, then one pass per fresh change signal
//!
//! ```text
//! STARTING --pass--> IDLE --newer signal--> RUNNING --> IDLE
//!                      \--shutdown request--> STOPPED
//! ```
//!
//! Passes run to completion on the blocking pool and are awaited before the
//! loop looks at its inputs again, so a shutdown request is only ever
//! serviced between passes and two passes never overlap.

mod signals;

use crate::commands::sync::PassStats;
use crate::types::SortError;
use crate::watch::ChangeSignal;
use std::fmt;
use std::time::SystemTime;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

pub use signals::ShutdownSignals;

/// Something that can run one full synchronization pass
pub trait SyncPass: Send + 'static {
    fn run_pass(&mut self) -> Result<PassStats, SortError>;
}

/// Run loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Idle,
    Running,
    Stopped,
}

/// Why the run loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGTERM
    Terminate,
    /// SIGHUP
    Hangup,
    /// Ctrl-C / SIGINT
    Interrupt,
    /// Every change signal sender is gone
    WatcherClosed,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShutdownReason::Terminate => "terminate signal",
            ShutdownReason::Hangup => "hangup signal",
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::WatcherClosed => "watcher closed",
        };
        f.write_str(label)
    }
}

/// Debounce clock and lifecycle of the pass driver
#[derive(Debug)]
pub struct RunLoop {
    last_run: SystemTime,
    state: LoopState,
    passes: usize,
}

impl Default for RunLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLoop {
    pub fn new() -> Self {
        Self {
            last_run: SystemTime::UNIX_EPOCH,
            state: LoopState::Starting,
            passes: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Start time of the most recent pass
    pub fn last_run(&self) -> SystemTime {
        self.last_run
    }

    /// Passes completed successfully so far
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Drive `pass` until a shutdown request or the signal queue closes
    ///
    /// Signals not strictly newer than the last pass start are discarded,
    /// which collapses any burst queued during a pass into at most one
    /// follow-up pass.
    ///
    /// # Errors
    /// A pass error for which [`SortError::is_fatal`] holds ends the loop;
    /// any other pass error is logged and the loop keeps serving.
    pub async fn run<P: SyncPass>(
        &mut self,
        pass: P,
        mut signals: mpsc::Receiver<ChangeSignal>,
        mut shutdown: oneshot::Receiver<ShutdownReason>,
    ) -> Result<ShutdownReason, SortError> {
        // Catch anything that landed before the watcher attached
        let mut pass = self.execute(pass).await?;

        let mut shutdown_open = true;
        let reason = loop {
            self.transition(LoopState::Idle);

            tokio::select! {
                biased;

                request = &mut shutdown, if shutdown_open => match request {
                    Ok(reason) => break reason,
                    Err(_) => {
                        warn!("Shutdown listener went away; continuing without it");
                        shutdown_open = false;
                    }
                },

                signal = signals.recv() => match signal {
                    Some(signal) if signal.is_newer_than(self.last_run) => {
                        info!("Source directory did change");
                        pass = self.execute(pass).await?;
                    }
                    Some(_) => trace!("Discarding change signal older than last run"),
                    None => break ShutdownReason::WatcherClosed,
                },
            }
        };

        self.transition(LoopState::Stopped);
        Ok(reason)
    }

    /// Run one pass on the blocking pool and hand the pass back
    async fn execute<P: SyncPass>(&mut self, mut pass: P) -> Result<P, SortError> {
        self.transition(LoopState::Running);
        self.last_run = SystemTime::now();

        let (pass, result) = tokio::task::spawn_blocking(move || {
            let result = pass.run_pass();
            (pass, result)
        })
        .await
        .map_err(|e| SortError::Task(e.to_string()))?;

        match result {
            Ok(_) => self.passes += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => warn!("Pass failed, waiting for the next change: {}", e),
        }
        Ok(pass)
    }

    fn transition(&mut self, next: LoopState) {
        if self.state != next {
            debug!("Run loop {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
