//! Error types for txtview.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions up to [`AppError`].
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error
//!   - [`InputError`] - Opening the file or reading stdin failed
//!   - [`IndexError`] - Building the line index failed (decode or read failure)
//!   - [`crate::config::ConfigError`] - Config file could not be read or parsed
//!   - [`crate::logging::LoggingError`] - Tracing subscriber setup failed
//!   - `std::io::Error` - Terminal failures
//!
//! # Error Recovery Strategy
//!
//! Decode failures, out-of-range line requests and persistence problems are
//! **recoverable**: the reader reports them in the status bar and keeps running.
//! The user can pick another encoding and the index is rebuilt from scratch.
//! Only failures to set up the terminal or open the input end the process.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// Returned from `main` logic. Domain errors convert via `From`, so the `?`
/// operator works throughout the startup path.
///
/// # Examples
///
/// ```no_run
/// use txtview::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     let _input = open_input()?;
///     Ok(())
/// }
/// # fn open_input() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to open or read the input source.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Failed to build the line index for the input.
    #[error("Failed to index input: {0}")]
    Index(#[from] IndexError),

    /// Invalid configuration file.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Unknown encoding label given on the command line or in the config.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Terminal or TUI rendering error.
    ///
    /// Without a working terminal the reader cannot function, so this is fatal.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when opening the text to read.
///
/// # Recovery Patterns
///
/// - **FileNotFound** / **NotTextFile**: display error and exit
/// - **NoInput**: display usage - user must provide a path or pipe stdin
/// - **Io**: permissions, disk errors - display and exit
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use txtview::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.txt")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.txt"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// The file extension is not one of the accepted text extensions.
    ///
    /// Bypassed with `--any-file`.
    #[error("Not a text file (.txt, .log, .csv): {path}")]
    NotTextFile {
        /// The rejected path.
        path: PathBuf,
    },

    /// No input source was provided.
    ///
    /// ```
    /// use txtview::model::error::InputError;
    ///
    /// let msg = InputError::NoInput.to_string();
    /// assert!(msg.contains("file path or pipe data to stdin"));
    /// ```
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from building a [`crate::index::LineIndex`].
///
/// A failed build never leaves a partial index behind. The caller retries
/// with a different encoding rather than resuming.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A chunk could not be decoded under the selected encoding.
    ///
    /// ```
    /// use txtview::model::error::IndexError;
    ///
    /// let err = IndexError::Decode { chunk: 3, offset: 3_145_728, encoding: "UTF-8" };
    /// assert!(err.to_string().contains("chunk 3"));
    /// assert!(err.to_string().contains("UTF-8"));
    /// ```
    #[error("Cannot decode chunk {chunk} (byte offset {offset}) as {encoding}; try another encoding")]
    Decode {
        /// 0-based index of the chunk that failed.
        chunk: usize,
        /// Byte offset where the chunk starts.
        offset: u64,
        /// Name of the encoding used.
        encoding: &'static str,
    },

    /// Chunk size must be at least one byte.
    #[error("Chunk size must be at least 1 byte")]
    InvalidChunkSize,

    /// Reading the source failed.
    #[error("IO error while indexing: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from materializing a single line.
#[derive(Debug, Error)]
pub enum LineError {
    /// Line number is beyond the indexed line count.
    #[error("Line {line} out of range (document has {total} lines)")]
    OutOfRange {
        /// Requested 0-based line.
        line: usize,
        /// Total line count.
        total: usize,
    },

    /// Reading the source failed.
    #[error("IO error while reading line: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors from viewport navigation.
///
/// No state changes when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// Requested 1-based line is outside `[1, total]`.
    ///
    /// ```
    /// use txtview::model::error::ViewportError;
    ///
    /// let err = ViewportError::LineOutOfRange { line: 0, total: 10 };
    /// assert!(err.to_string().contains("1..=10"));
    /// ```
    #[error("Line {line} is out of range; enter a line in 1..={total}")]
    LineOutOfRange {
        /// Requested 1-based line.
        line: usize,
        /// Total line count.
        total: usize,
    },

    /// Navigation requested before any document is open.
    #[error("No file is open")]
    NoDocument,
}

/// Errors from the reading-progress store.
///
/// Reads never surface these: corrupt or missing data reads as "no progress".
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Store backend could not be written.
    #[error("Progress store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Records could not be serialized.
    #[error("Progress serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from resolving an encoding name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The label is not a known WHATWG encoding label.
    #[error("Unknown encoding: {0}")]
    UnknownLabel(String),
}
