//! Tracing subscriber initialization.
//!
//! The TUI owns the terminal, so logs go to a file. Follow them with
//! `tail -f` in another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the tracing subscriber with file-based logging.
///
/// Respects `RUST_LOG`, defaults to "info". Creates the log directory if it
/// doesn't exist. The file is appended to and never rotated.
///
/// # Errors
///
/// `LoggingError` if the path has no file name, the directory cannot be
/// created, or a subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)?;

    tracing::info!(path = %log_path.display(), "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("txtview_test_logs_create");
        let log_file = test_dir.join("test.log");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail if the subscriber is already set; the directory is created first.
        let _ = init(&log_file);

        assert!(
            test_dir.exists(),
            "Log directory should be created: {:?}",
            test_dir
        );
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_rejects_path_without_file_name() {
        let err = init(Path::new("/")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidPath(_)));
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let test_dir = std::env::temp_dir().join("txtview_test_logs_twice");
        let log_file = test_dir.join("twice.log");

        let _ = init(&log_file);
        let err = init(&log_file).unwrap_err();

        assert!(matches!(err, LoggingError::SubscriberAlreadySet));
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn env_filter_defaults_to_info() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter().to_string(), DEFAULT_FILTER);
    }

    #[test]
    #[serial(tracing_init)]
    fn env_filter_respects_rust_log() {
        std::env::set_var("RUST_LOG", "txtview=debug");
        let filter = env_filter();
        std::env::remove_var("RUST_LOG");

        assert_eq!(filter.to_string(), "txtview=debug");
    }
}
