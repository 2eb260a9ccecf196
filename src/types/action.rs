//! CopyOutcome - What happened to one candidate during a pass

use super::SortError;

/// Result of handling a single unseen candidate
#[derive(Debug)]
pub enum CopyOutcome {
    /// Bytes were streamed into a new destination file
    Copied { bytes: u64 },

    /// Destination already existed, nothing written
    Exists,

    /// Copy abandoned (partial destination removed)
    Failed(SortError),
}

impl CopyOutcome {
    /// Short label for log lines
    pub fn label(&self) -> &'static str {
        match self {
            CopyOutcome::Copied { .. } => "Copied",
            CopyOutcome::Exists => "Exists",
            CopyOutcome::Failed(_) => "Failed",
        }
    }
}
