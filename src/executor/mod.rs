//! Executor module for file operations

pub mod copy;

use crate::types::Candidate;
use std::path::{Path, PathBuf};

pub use copy::copy_candidate;

/// Where a candidate lands: `<target>/<YYYY>/<name>`
///
/// The year is the local calendar year of the candidate's mtime; `None` when
/// that mtime has no representable year.
pub fn destination_path(target: &Path, candidate: &Candidate) -> Option<PathBuf> {
    let bucket = candidate.year_bucket()?;
    Some(target.join(bucket).join(&candidate.name))
}
