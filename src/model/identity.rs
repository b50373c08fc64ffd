//! File identity used to key reading progress.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a source for persistence purposes: `(name, length)`.
///
/// Two files with the same name and byte length are treated as the same
/// document. The name is the final path component, not the full path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileIdentity {
    /// File name without directories.
    pub name: String,
    /// Total length in bytes.
    pub length: u64,
}

impl FileIdentity {
    /// Create a new identity.
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.length)
    }
}
