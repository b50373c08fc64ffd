//! Reading progress: the last line read, remembered per file.
//!
//! Records live in a [`KeyValueStore`] under [`RECORDS_KEY`] as a JSON array.
//! A file is identified by name and byte length only, so two different files
//! with the same name and size share a record.

mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use crate::model::error::ProgressError;
use crate::model::FileIdentity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Key holding the record array.
pub const RECORDS_KEY: &str = "textReaderRecords";

/// Maximum number of records kept.
pub const MAX_RECORDS: usize = 10;

/// Last position read in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    /// File name.
    #[serde(alias = "fileName")]
    pub name: String,
    /// File size in bytes.
    #[serde(alias = "fileSize")]
    pub length: u64,
    /// 1-based line at the top of the viewport when saved.
    #[serde(alias = "lastPosition")]
    pub last_line: usize,
    /// Save time in epoch milliseconds.
    #[serde(alias = "lastAccess")]
    pub last_access_time: i64,
}

impl ReadingProgress {
    fn matches(&self, identity: &FileIdentity) -> bool {
        self.name == identity.name && self.length == identity.length
    }
}

/// Default progress directory: `<data_dir>/txtview`.
pub fn default_progress_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("txtview")
    } else {
        PathBuf::from(".txtview")
    }
}

/// Reads and writes [`ReadingProgress`] records.
#[derive(Debug)]
pub struct ProgressStore {
    backend: Box<dyn KeyValueStore>,
}

impl ProgressStore {
    /// Wrap a backend.
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by JSON files in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(JsonFileStore::new(dir)))
    }

    /// Store that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// All records. Unreadable or corrupt data reads as empty.
    pub fn records(&self) -> Vec<ReadingProgress> {
        let raw = match self.backend.get(RECORDS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Cannot read reading progress");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Ignoring corrupt reading progress");
                Vec::new()
            }
        }
    }

    /// Record `line` for `identity` at the current time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the records cannot be written.
    pub fn save(&mut self, identity: &FileIdentity, line: usize) -> Result<(), ProgressError> {
        self.save_at(identity, line, chrono::Utc::now().timestamp_millis())
    }

    /// Record `line` for `identity` with an explicit timestamp.
    ///
    /// An existing record for the identity is replaced in place. A new record
    /// is appended; past [`MAX_RECORDS`] the least recently saved records are
    /// dropped, the newer insertion winning on equal timestamps.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the records cannot be written.
    pub fn save_at(
        &mut self,
        identity: &FileIdentity,
        line: usize,
        now_ms: i64,
    ) -> Result<(), ProgressError> {
        let mut records = self.records();
        let record = ReadingProgress {
            name: identity.name.clone(),
            length: identity.length,
            last_line: line,
            last_access_time: now_ms,
        };

        if let Some(existing) = records.iter_mut().find(|r| r.matches(identity)) {
            *existing = record;
        } else {
            records.push(record);
            if records.len() > MAX_RECORDS {
                records.reverse();
                records.sort_by(|a, b| b.last_access_time.cmp(&a.last_access_time));
                records.truncate(MAX_RECORDS);
            }
        }

        let json = serde_json::to_string(&records)?;
        self.backend.set(RECORDS_KEY, &json)?;
        debug!(file = %identity, line, "Saved reading position");
        Ok(())
    }

    /// Saved line for `identity` if it is within `1..=total_lines`.
    pub fn restore(&self, identity: &FileIdentity, total_lines: usize) -> Option<usize> {
        self.records()
            .into_iter()
            .find(|r| r.matches(identity))
            .map(|r| r.last_line)
            .filter(|&line| line >= 1 && line <= total_lines)
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
