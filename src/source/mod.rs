//! Byte sources for the reader.
//!
//! This module provides randomly sliceable byte sources:
//! - [`FileSource`] for files on disk (positioned reads, never loads the whole file)
//! - [`MemorySource`] for owned bytes (piped stdin, tests)
//! - [`InputSource`] to pick one from the command line

use crate::model::error::InputError;
use crate::model::FileIdentity;
use std::fmt;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod file;
pub mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

/// Extensions accepted as text files.
pub const TEXT_EXTENSIONS: [&str; 3] = ["txt", "log", "csv"];

/// An immutable byte sequence of known length that can be sliced at random.
///
/// Implementations must be shareable across threads: lines of a range are
/// decoded in parallel.
pub trait ByteSource: Send + Sync + fmt::Debug {
    /// Display name (file name without directories).
    fn name(&self) -> &str;

    /// Total length in bytes.
    fn len(&self) -> u64;

    /// Whether the source has no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the bytes in `range`. The end is clamped to `len()`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>>;

    /// Identity used to key reading progress.
    fn identity(&self) -> FileIdentity {
        FileIdentity::new(self.name(), self.len())
    }

    /// A fresh source over the same data, picking up changes made since this
    /// one was opened. `None` when the data cannot change (owned bytes).
    ///
    /// # Errors
    ///
    /// Returns the I/O error from reopening.
    fn reopen(&self) -> io::Result<Option<Arc<dyn ByteSource>>> {
        Ok(None)
    }
}

/// Input selected on the command line.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// A file on disk.
    File(FileSource),
    /// Piped stdin, read to the end.
    Stdin(MemorySource),
}

impl InputSource {
    /// Convert into a shared byte source for the reader.
    pub fn into_shared(self) -> Arc<dyn ByteSource> {
        match self {
            InputSource::File(f) => Arc::new(f),
            InputSource::Stdin(m) => Arc::new(m),
        }
    }
}

/// Detect and create the appropriate input source.
///
/// # Logic:
/// 1. File path given: must exist and, unless `any_file`, have a text extension
/// 2. No path and stdin is piped: read stdin to the end
/// 3. Else: `InputError::NoInput`
///
/// # Errors
///
/// Returns `FileNotFound`, `NotTextFile`, `NoInput` or `Io`.
pub fn detect_input_source(file: Option<PathBuf>, any_file: bool) -> Result<InputSource, InputError> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(InputError::FileNotFound { path });
            }
            if !any_file && !is_text_file(&path) {
                return Err(InputError::NotTextFile { path });
            }
            Ok(InputSource::File(FileSource::open(path)?))
        }
        None => Ok(InputSource::Stdin(memory::read_stdin()?)),
    }
}

/// Whether a path looks like a text file: `.txt`, `.log` or `.csv`
/// (case-insensitive), or no extension at all.
pub fn is_text_file(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => TEXT_EXTENSIONS
            .iter()
            .any(|accepted| ext.eq_ignore_ascii_case(accepted)),
        None => true,
    }
}

/// Human-readable file size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
///
/// Two decimals, trailing zeros trimmed.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
