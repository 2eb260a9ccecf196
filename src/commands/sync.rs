//! One synchronization pass over the source directory

use crate::daemon::SyncPass;
use crate::executor::copy_candidate;
use crate::scanner::scan_source;
use crate::seen::{SeenSet, SeenStore};
use crate::types::{Candidate, CopyOutcome, SortError};
use crate::Config;
use indicatif::HumanBytes;
use tracing::{debug, error, info, warn};

/// Counters for a single pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Regular, non-hidden files found in the source
    pub candidates: usize,
    /// Candidates skipped because their name was already seen
    pub already_seen: usize,
    /// Files written to the target
    pub copied: usize,
    /// Files whose destination already existed
    pub existing: usize,
    /// Files whose copy was abandoned
    pub failed: usize,
    /// Aggregate bytes written
    pub bytes_copied: u64,
}

impl PassStats {
    /// Whether at least one unseen candidate was handled (log only)
    pub fn processed(&self) -> bool {
        self.copied + self.existing + self.failed > 0
    }
}

/// Outcome of a pass: the replacement seen set and its counters
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub seen: SeenSet,
    pub stats: PassStats,
}

/// Run one pass: scan, diff against `seen`, copy what is new
///
/// The returned seen set is built from scratch out of the current listing.
/// Names already in `seen` are never copied again, whatever their mtime or
/// content. A failed copy is still recorded as seen unless
/// `config.retry_failed` is set.
///
/// # Errors
/// * `SortError::SourceUnreadable` - the source directory cannot be listed
pub fn run(config: &Config, seen: &SeenSet) -> Result<PassReport, SortError> {
    info!("Starting sort...");
    let candidates = scan_source(&config.source)?;
    let report = sync_candidates(config, seen, &candidates);

    let stats = &report.stats;
    if stats.processed() {
        info!(
            "Sort complete: {} copied ({}), {} existing, {} failed",
            stats.copied,
            HumanBytes(stats.bytes_copied),
            stats.existing,
            stats.failed
        );
    } else {
        info!("Sort complete (no changes)");
    }

    Ok(report)
}

/// Diff and copy an already-listed set of candidates
pub fn sync_candidates(config: &Config, seen: &SeenSet, candidates: &[Candidate]) -> PassReport {
    let mut report = PassReport::default();
    report.stats.candidates = candidates.len();

    for candidate in candidates {
        report.seen.insert(candidate.name.clone());

        if seen.contains(&candidate.name) {
            report.stats.already_seen += 1;
            continue;
        }

        let outcome = copy_candidate(candidate, config);
        debug!("{}: {}", candidate.name.to_string_lossy(), outcome.label());

        match outcome {
            CopyOutcome::Copied { bytes } => {
                report.stats.copied += 1;
                report.stats.bytes_copied += bytes;
            }
            CopyOutcome::Exists => report.stats.existing += 1,
            CopyOutcome::Failed(err) => {
                report.stats.failed += 1;
                if err.is_per_file() {
                    warn!("{}", err);
                } else {
                    error!("{}", err);
                }
                if config.retry_failed {
                    report.seen.remove(&candidate.name);
                }
            }
        }
    }

    report
}

/// The production pass: engine plus persisted seen set
///
/// The seen set is loaded once at construction and replaced after every
/// pass, in memory and on disk.
#[derive(Debug)]
pub struct Syncer {
    config: Config,
    store: SeenStore,
    seen: SeenSet,
}

impl Syncer {
    pub fn new(config: Config, store: SeenStore) -> Self {
        let seen = store.load();
        Self {
            config,
            store,
            seen,
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }
}

impl SyncPass for Syncer {
    fn run_pass(&mut self) -> Result<PassStats, SortError> {
        let PassReport { seen, stats } = run(&self.config, &self.seen)?;
        self.store.save(&seen);
        self.seen = seen;
        Ok(stats)
    }
}
