//! In-memory byte source.

use super::ByteSource;
use crate::model::error::InputError;
use std::io::{self, IsTerminal, Read};
use std::ops::Range;
use std::sync::Arc;

/// Name used for text piped through stdin.
pub const STDIN_NAME: &str = "<stdin>";

/// Owned bytes behind an `Arc`, cheap to clone.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    /// Wrap bytes under a display name.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read everything from `reader`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from reading.
    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(name, bytes))
    }

    /// The full contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ByteSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        let len = self.bytes.len();
        let start = (range.start as usize).min(len);
        let end = (range.end as usize).min(len).max(start);
        Ok(self.bytes[start..end].to_vec())
    }
}

/// Read piped stdin to the end.
///
/// # Errors
///
/// Returns `InputError::NoInput` if stdin is an interactive terminal, so the
/// reader never blocks waiting for typed input.
pub fn read_stdin() -> Result<MemorySource, InputError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(InputError::NoInput);
    }
    Ok(MemorySource::from_reader(STDIN_NAME, stdin.lock())?)
}
