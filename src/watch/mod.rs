//! Filesystem change notifications, flattened to timestamps
//!
//! Every raw notify event on the source directory becomes a
//! [`ChangeSignal`] carrying the wall-clock time it was observed. Event kinds
//! are not inspected: a pass always rescans the whole directory, so the only
//! thing the run loop needs is "something changed at T". Coalescing happens
//! downstream, where signals older than the last pass start are discarded.

use crate::types::SortError;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::time::SystemTime;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, trace, warn};

/// Capacity of the signal queue between watcher and run loop
pub const SIGNAL_QUEUE_CAPACITY: usize = 1024;

/// "The source directory changed at `observed_at`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChangeSignal {
    pub observed_at: SystemTime,
}

impl ChangeSignal {
    pub fn now() -> Self {
        Self::at(SystemTime::now())
    }

    pub fn at(observed_at: SystemTime) -> Self {
        Self { observed_at }
    }

    /// Strictly later than `instant`
    pub fn is_newer_than(&self, instant: SystemTime) -> bool {
        self.observed_at > instant
    }
}

/// Handle keeping the underlying OS watcher alive
///
/// Dropping it stops notifications and, once the last sender is gone,
/// closes the signal queue.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
}

impl std::fmt::Debug for SourceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWatcher").finish_non_exhaustive()
    }
}

/// Start watching `source` (non-recursive), emitting onto `signals`
///
/// # Errors
/// * `SortError::Watch` - the OS watcher could not be created or attached
pub fn watch_source(
    source: &Path,
    signals: mpsc::Sender<ChangeSignal>,
) -> Result<SourceWatcher, SortError> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            trace!("Watch event: {:?}", event.kind);
            emit_signal(&signals);
        }
        Err(e) => warn!("Watch error: {}", e),
    })?;

    watcher.watch(source, RecursiveMode::NonRecursive)?;
    info!("Watching source directory: {}", source.display());

    Ok(SourceWatcher { _watcher: watcher })
}

/// Enqueue a signal stamped now; a full queue drops it
///
/// Returns whether the signal was queued.
pub fn emit_signal(signals: &mpsc::Sender<ChangeSignal>) -> bool {
    match signals.try_send(ChangeSignal::now()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("Signal queue full, dropping change signal");
            false
        }
        Err(TrySendError::Closed(_)) => {
            trace!("Signal queue closed, dropping change signal");
            false
        }
    }
}
