//! Cache of materialized line text.

use std::collections::HashMap;

/// Decoded line text keyed by 0-based line number.
///
/// Grows without bound while a document is open; only [`LineCache::clear`]
/// evicts entries. Inserting an existing key overwrites it with identical
/// text, so duplicate loads are harmless.
#[derive(Debug, Default, Clone)]
pub struct LineCache {
    lines: HashMap<usize, String>,
}

impl LineCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached text for a line.
    pub fn get(&self, line: usize) -> Option<&str> {
        self.lines.get(&line).map(String::as_str)
    }

    /// Whether a line is cached.
    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains_key(&line)
    }

    /// Store text for a line.
    pub fn insert(&mut self, line: usize, text: String) {
        self.lines.insert(line, text);
    }

    /// Get the cached text or compute and store it.
    ///
    /// # Errors
    ///
    /// Propagates the error from `load`; nothing is stored in that case.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        line: usize,
        load: impl FnOnce() -> Result<String, E>,
    ) -> Result<&str, E> {
        use std::collections::hash_map::Entry;

        match self.lines.entry(line) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_str()),
            Entry::Vacant(entry) => Ok(entry.insert(load()?).as_str()),
        }
    }

    /// Number of cached lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every cached line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
