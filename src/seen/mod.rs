//! Persistent set of source file names already handled
//!
//! The list lives at `<user cache dir>/photosorter/seen`, one name per line.
//! Names are stored as their raw OS bytes, so a name that is not valid UTF-8
//! round-trips exactly on Unix.
//! Reads never fail the caller: a missing or unreadable file is an empty set.
//! Writes truncate and rewrite the whole file; a failed write is logged and
//! the next restart simply reprocesses, which is safe because copies skip
//! destinations that already exist.

use crate::types::SortError;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Names of every candidate observed at the end of the last pass
pub type SeenSet = HashSet<OsString>;

const STATE_DIR: &str = "photosorter";
const STATE_FILE: &str = "seen";

/// Reader/writer for the on-disk seen list
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    /// Resolve the per-user cache location
    ///
    /// # Errors
    /// * `SortError::CacheDirUnavailable` - no cache directory for this user
    pub fn locate() -> Result<Self, SortError> {
        let cache_dir = dirs::cache_dir().ok_or(SortError::CacheDirUnavailable)?;
        Ok(Self::at(cache_dir.join(STATE_DIR).join(STATE_FILE)))
    }

    /// Use an explicit state file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the state file's parent directory exists (mode 0700 on Unix)
    pub fn prepare(&self) -> Result<(), SortError> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        info!("Storing seen cache in: {}", parent.display());
        create_private_dir(parent)?;
        Ok(())
    }

    /// Read the persisted set, or an empty set on any read error
    pub fn load(&self) -> SeenSet {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(_) => return SeenSet::new(),
        };

        let mut seen = SeenSet::new();
        for line in BufReader::new(file).split(b'\n') {
            match line {
                Ok(raw) if !raw.is_empty() => {
                    seen.insert(name_from_bytes(raw));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Seen list {} is unreadable past {} entries: {}",
                        self.path.display(),
                        seen.len(),
                        e
                    );
                    break;
                }
            }
        }
        seen
    }

    /// Overwrite the persisted set; failures are logged, never returned
    pub fn save(&self, seen: &SeenSet) {
        if let Err(e) = self.write(seen) {
            warn!("Failed to write seen list {}: {}", self.path.display(), e);
        }
    }

    fn write(&self, seen: &SeenSet) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for name in seen {
            writer.write_all(&name_to_bytes(name))?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

#[cfg(unix)]
fn name_from_bytes(raw: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(raw)
}

#[cfg(not(unix))]
fn name_from_bytes(raw: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&raw).into_owned())
}

#[cfg(unix)]
fn name_to_bytes(name: &OsStr) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
fn name_to_bytes(name: &OsStr) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(name.to_string_lossy().into_owned().into_bytes())
}

/// Create `path` and any missing parents, owner-only on Unix
pub(crate) fn create_private_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn set(names: &[&str]) -> SeenSet {
        names.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().expect("create tempdir");
        let store = SeenStore::at(dir.path().join("photosorter").join("seen"));

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("create tempdir");
        let store = SeenStore::at(dir.path().join("seen"));
        let seen = set(&["a.jpg", "b.png", "IMG 0001.HEIC"]);

        store.save(&seen);

        assert_eq!(store.load(), seen);
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = TempDir::new().expect("create tempdir");
        let store = SeenStore::at(dir.path().join("seen"));

        store.save(&set(&["old.jpg", "kept.jpg"]));
        store.save(&set(&["kept.jpg"]));

        assert_eq!(store.load(), set(&["kept.jpg"]));
    }

    #[test]
    fn test_file_format_is_newline_delimited() {
        let dir = TempDir::new().expect("create tempdir");
        let store = SeenStore::at(dir.path().join("seen"));

        store.save(&set(&["only.jpg"]));

        let raw = fs::read_to_string(store.path()).expect("read state file");
        assert_eq!(raw, "only.jpg\n");
    }

    #[test]
    fn test_load_ignores_blank_lines() {
        let dir = TempDir::new().expect("create tempdir");
        let path = dir.path().join("seen");
        fs::write(&path, "a.jpg\n\nb.jpg\n").expect("write state file");

        assert_eq!(SeenStore::at(&path).load(), set(&["a.jpg", "b.jpg"]));
    }

    #[test]
    #[cfg(unix)]
    fn test_non_utf8_name_round_trips() {
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().expect("create tempdir");
        let store = SeenStore::at(dir.path().join("seen"));
        let latin1 = OsStr::from_bytes(b"caf\xe9.jpg").to_os_string();
        let seen: SeenSet = [latin1.clone(), OsString::from("plain.jpg")].into();

        store.save(&seen);

        let raw = fs::read(store.path()).expect("read state file");
        assert!(raw.windows(8).any(|w| w == b"caf\xe9.jpg"));
        assert_eq!(store.load(), seen);
    }

    #[test]
    fn test_save_without_parent_dir_is_silent() {
        let dir = TempDir::new().expect("create tempdir");
        let store = SeenStore::at(dir.path().join("missing").join("seen"));

        store.save(&set(&["a.jpg"]));

        assert!(!store.path().exists());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_prepare_creates_parent() {
        let dir = TempDir::new().expect("create tempdir");
        let store = SeenStore::at(dir.path().join("cache").join("photosorter").join("seen"));

        store.prepare().expect("prepare state dir");
        store.prepare().expect("prepare is idempotent");

        let parent = store.path().parent().expect("state file has a parent");
        assert!(parent.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(parent).expect("parent metadata").permissions().mode();
            assert_eq!(mode & 0o077, 0, "state dir should be owner-only");
        }
    }

    #[test]
    fn test_locate_uses_photosorter_subdir() {
        if let Ok(store) = SeenStore::locate() {
            assert!(store.path().ends_with("photosorter/seen"));
        }
    }
}
