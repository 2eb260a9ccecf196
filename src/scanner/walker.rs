//! Single-level source directory listing

use crate::types::{is_hidden, Candidate, SortError};
use std::fs;
use std::path::Path;
use tracing::warn;

/// List the candidates directly inside `source`
///
/// Only the immediate entries are considered. Hidden names (leading `.`)
/// and anything that is not a regular file (directories, symlinks, devices)
/// are left out entirely.
///
/// # Returns
/// * `Ok(Vec<Candidate>)` - Candidates sorted by name
/// * `Err(SortError::SourceUnreadable)` - The directory itself could not be listed
///
/// # Errors
/// * Entries whose type or metadata cannot be read are skipped with a warning
///
/// Names are taken as raw OS strings; a name that is not valid UTF-8 is a
/// candidate like any other.
pub fn scan_source(source: &Path) -> Result<Vec<Candidate>, SortError> {
    let entries = fs::read_dir(source).map_err(|e| SortError::SourceUnreadable {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();

    for result in entries {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error while listing {}: {}", source.display(), e);
                continue;
            }
        };

        let name = entry.file_name();
        if is_hidden(&name) {
            continue;
        }

        // DirEntry::file_type does not follow symlinks
        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                warn!("Failed to read file type for {}: {}", entry.path().display(), e);
                continue;
            }
        }

        let mtime = match entry.metadata().and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(e) => {
                warn!(
                    "Failed to read modification time for {}: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        candidates.push(Candidate::new(name, mtime));
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}
