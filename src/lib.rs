//! # photosorter - File new photos by year
//!
//! Watches a drop folder and copies every file it has not seen before into
//! `<target>/<year>/<name>`, where the year comes from the file's
//! modification time. The names already handled are remembered across
//! restarts, and bursts of filesystem events collapse into a single rescan.

// Module declarations
pub mod commands;
pub mod config;
pub mod daemon;
pub mod executor;
pub mod scanner;
pub mod seen;
pub mod types;
pub mod watch;

// Re-export commonly used types
pub use commands::sync::{PassReport, PassStats, Syncer};
pub use config::Config;
pub use daemon::{RunLoop, ShutdownReason, SyncPass};
pub use seen::{SeenSet, SeenStore};
pub use types::{Candidate, CopyOutcome, SortError};
pub use watch::{ChangeSignal, SIGNAL_QUEUE_CAPACITY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
