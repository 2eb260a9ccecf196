//! Error types for photosorter

use std::path::PathBuf;
use thiserror::Error;

/// Error types for photosorter operations
#[derive(Debug, Error)]
pub enum SortError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No per-user cache directory to keep the seen list in
    #[error("No cache directory available to store the seen list")]
    CacheDirUnavailable,

    /// The source directory could not be listed
    #[error("Cannot read source directory {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a single file failed
    #[error("Copy failed for {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Modification time has no calendar year to bucket the file under
    #[error("Modification time of {path} is outside the supported calendar range")]
    UnsupportedTimestamp { path: PathBuf },

    /// Filesystem watcher could not be set up
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Background pass task failed to complete
    #[error("Sync task failed: {0}")]
    Task(String),
}

impl SortError {
    /// Build a per-file copy error
    pub fn copy(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SortError::Copy {
            path: path.into(),
            source,
        }
    }

    /// Check if this error should terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SortError::Config(_)
                | SortError::CacheDirUnavailable
                | SortError::SourceUnreadable { .. }
                | SortError::Watch(_)
                | SortError::Task(_)
        )
    }

    /// Check if this error only affects a single file
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            SortError::Copy { .. } | SortError::UnsupportedTimestamp { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_error_automatic_conversion() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let sort_error: SortError = io_error.into();

        assert!(matches!(sort_error, SortError::Io(_)));
        assert!(sort_error.to_string().contains("IO error"));
    }

    #[test]
    fn test_io_error_from_function() {
        fn returns_io_error() -> Result<(), SortError> {
            let _file = std::fs::File::open("/nonexistent/path/file.txt")?;
            Ok(())
        }

        let result = returns_io_error();
        assert!(matches!(result.unwrap_err(), SortError::Io(_)));
    }

    #[test]
    fn test_config_error_is_fatal() {
        let error = SortError::Config("Source and target paths must both be provided".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("must both be provided"));
        assert!(error.is_fatal());
        assert!(!error.is_per_file());
    }

    #[test]
    fn test_source_unreadable_names_path() {
        let error = SortError::SourceUnreadable {
            path: PathBuf::from("/photos/inbox"),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/photos/inbox"));
        assert!(error.is_fatal());
    }

    #[test]
    fn test_copy_error_is_per_file() {
        let error = SortError::copy(
            "/photos/inbox/a.jpg",
            IoError::new(ErrorKind::NotFound, "gone"),
        );
        assert!(error.to_string().contains("a.jpg"));
        assert!(error.is_per_file());
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_unsupported_timestamp_is_per_file() {
        let error = SortError::UnsupportedTimestamp {
            path: PathBuf::from("/photos/inbox/far.jpg"),
        };
        assert!(error.to_string().contains("far.jpg"));
        assert!(error.is_per_file());
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_cache_dir_unavailable_is_fatal() {
        assert!(SortError::CacheDirUnavailable.is_fatal());
        assert!(SortError::Task("join".to_string()).is_fatal());
        assert!(!SortError::Io(IoError::new(ErrorKind::Other, "x")).is_fatal());
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let error = SortError::copy("x.jpg", IoError::new(ErrorKind::UnexpectedEof, "short read"));
        let source = error.source().expect("copy error carries its io cause");
        assert!(source.to_string().contains("short read"));
    }
}
