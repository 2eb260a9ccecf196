//! Streaming file copy into a year bucket

use crate::types::{Candidate, CopyOutcome, SortError};
use crate::Config;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tracing::{info, warn};

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy one unseen candidate to `<target>/<year>/<name>`
///
/// 1. Resolve the year bucket (an mtime with no calendar year fails the file)
/// 2. Skip if the destination already exists (never overwrite)
/// 3. Create the year directory
/// 4. Stream source bytes into a freshly created destination
/// 5. Carry the source mtime over to the copy
///
/// A failure after the destination was created removes the partial file.
/// Nothing here returns an error: every problem becomes `CopyOutcome::Failed`
/// so the pass can move on to the next file.
pub fn copy_candidate(candidate: &Candidate, config: &Config) -> CopyOutcome {
    let src = config.source.join(&candidate.name);
    let Some(dest) = super::destination_path(&config.target, candidate) else {
        return CopyOutcome::Failed(SortError::UnsupportedTimestamp { path: src });
    };

    match fs::symlink_metadata(&dest) {
        Ok(_) => {
            info!(
                "Skipping because it exists, src: {} target: {}",
                src.display(),
                dest.display()
            );
            return CopyOutcome::Exists;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return CopyOutcome::Failed(SortError::copy(&dest, e)),
    }

    info!("Copying src: {} target: {}", src.display(), dest.display());

    if let Some(year_dir) = dest.parent() {
        if let Err(e) = crate::seen::create_private_dir(year_dir) {
            return CopyOutcome::Failed(SortError::copy(year_dir, e));
        }
    }

    let mut src_file = match File::open(&src) {
        Ok(file) => file,
        Err(e) => return CopyOutcome::Failed(SortError::copy(&src, e)),
    };

    let mut dest_file = match OpenOptions::new().write(true).create_new(true).open(&dest) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Skipping because it appeared meanwhile, target: {}", dest.display());
            return CopyOutcome::Exists;
        }
        Err(e) => return CopyOutcome::Failed(SortError::copy(&dest, e)),
    };

    let bytes = match stream(&mut src_file, &mut dest_file) {
        Ok(bytes) => bytes,
        Err(e) => {
            drop(dest_file);
            // Best effort: leave no partial file for the next attempt to trip over
            if let Err(rm) = fs::remove_file(&dest) {
                warn!("Failed to remove partial copy {}: {}", dest.display(), rm);
            }
            return CopyOutcome::Failed(SortError::copy(&src, e));
        }
    };
    drop(dest_file);

    preserve_mtime(candidate, &dest);

    CopyOutcome::Copied { bytes }
}

fn stream(src: &mut impl Read, dest: &mut impl Write) -> std::io::Result<u64> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match src.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        dest.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    dest.flush()?;
    Ok(total_bytes)
}

fn preserve_mtime(candidate: &Candidate, dest: &Path) {
    let mtime = filetime::FileTime::from_system_time(candidate.mtime);
    if let Err(e) = filetime::set_file_mtime(dest, mtime) {
        warn!("Could not set modification time on {}: {}", dest.display(), e);
    }
}
