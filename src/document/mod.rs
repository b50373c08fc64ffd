//! Line materializer.
//!
//! A [`Document`] pairs a byte source with its [`LineIndex`] and decodes
//! individual lines on demand into a [`LineCache`].

mod cache;

pub use cache::LineCache;

use crate::index::{self, IndexProgress, LineIndex};
use crate::model::encoding::TextEncoding;
use crate::model::error::{IndexError, LineError};
use crate::source::ByteSource;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// An indexed source with lazily decoded lines.
#[derive(Debug)]
pub struct Document {
    source: Arc<dyn ByteSource>,
    index: LineIndex,
    encoding: TextEncoding,
    cache: LineCache,
}

impl Document {
    /// Index `source` and return a document with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns the `IndexError` from building the index.
    pub fn open(
        source: Arc<dyn ByteSource>,
        chunk_size: u64,
        encoding: TextEncoding,
    ) -> Result<Self, IndexError> {
        Self::open_with_progress(source, chunk_size, encoding, |_| {})
    }

    /// [`Document::open`] reporting indexing progress after each chunk.
    pub fn open_with_progress<F>(
        source: Arc<dyn ByteSource>,
        chunk_size: u64,
        encoding: TextEncoding,
        on_progress: F,
    ) -> Result<Self, IndexError>
    where
        F: FnMut(IndexProgress),
    {
        let index = index::build_index_with_progress(&*source, chunk_size, encoding, on_progress)?;
        Ok(Self {
            source,
            index,
            encoding,
            cache: LineCache::new(),
        })
    }

    /// The underlying source.
    pub fn source(&self) -> &Arc<dyn ByteSource> {
        &self.source
    }

    /// The line index.
    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    /// Encoding used for indexing and decoding.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Total number of lines.
    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    /// Number of lines currently cached.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Cached text for a line, without loading.
    pub fn cached_line(&self, line: usize) -> Option<&str> {
        self.cache.get(line)
    }

    /// Text of a 0-based line, loading and caching it if needed.
    ///
    /// The text excludes the line feed.
    ///
    /// # Errors
    ///
    /// `LineError::OutOfRange` for lines past the end, `LineError::Io` if the
    /// read fails.
    pub fn load_line(&mut self, line: usize) -> Result<&str, LineError> {
        let (source, index, encoding) = (&*self.source, &self.index, self.encoding);
        self.cache
            .get_or_try_insert_with(line, || read_line(source, index, encoding, line))
    }

    /// Load every uncached line in the inclusive range `start..=end`.
    ///
    /// `end` is clamped to the last line; an inverted range is a no-op.
    /// Uncached lines are decoded in parallel and merged by line number.
    /// Returns how many lines were newly loaded.
    ///
    /// # Errors
    ///
    /// Returns the first read failure after storing every line that did load.
    pub fn load_range(&mut self, start: usize, end: usize) -> Result<usize, LineError> {
        let Some(last) = self.line_count().checked_sub(1) else {
            return Ok(0);
        };
        let end = end.min(last);
        if start > end {
            return Ok(0);
        }

        let missing: Vec<usize> = (start..=end).filter(|l| !self.cache.contains(*l)).collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let (source, index, encoding) = (&*self.source, &self.index, self.encoding);
        let results: Vec<(usize, Result<String, LineError>)> = missing
            .par_iter()
            .map(|&line| (line, read_line(source, index, encoding, line)))
            .collect();

        let mut loaded = 0;
        let mut first_error = None;
        for (line, result) in results {
            match result {
                Ok(text) => {
                    self.cache.insert(line, text);
                    loaded += 1;
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        debug!(start, end, loaded, cached = self.cache.len(), "loaded line range");
        match first_error {
            Some(e) => Err(e),
            None => Ok(loaded),
        }
    }

    /// Drop every cached line. The index is kept.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Read and decode one line. A byte-order mark at the start of the first
/// line is skipped.
fn read_line(
    source: &dyn ByteSource,
    index: &LineIndex,
    encoding: TextEncoding,
    line: usize,
) -> Result<String, LineError> {
    let span = index.line_span(line).ok_or(LineError::OutOfRange {
        line,
        total: index.line_count(),
    })?;
    if span.is_empty() {
        return Ok(String::new());
    }

    let bytes = source.read_range(span)?;
    let skip = if line == 0 { encoding.bom_len(&bytes) } else { 0 };
    Ok(encoding.decode_lossy(&bytes[skip..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn doc(bytes: &[u8], chunk: u64, encoding: TextEncoding) -> Document {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new("t.txt", bytes.to_vec()));
        Document::open(source, chunk, encoding).unwrap()
    }

    #[test]
    fn load_line_returns_text_without_line_feed() {
        let mut d = doc(b"a\nbb\nccc", 3, TextEncoding::utf8());
        assert_eq!(d.load_line(0).unwrap(), "a");
        assert_eq!(d.load_line(1).unwrap(), "bb");
        assert_eq!(d.load_line(2).unwrap(), "ccc");
        assert_eq!(d.cached_count(), 3);
    }

    #[test]
    fn load_line_out_of_range_is_error_and_caches_nothing() {
        let mut d = doc(b"a\nb", 16, TextEncoding::utf8());
        let err = d.load_line(5).unwrap_err();
        assert!(matches!(err, LineError::OutOfRange { line: 5, total: 2 }));
        assert_eq!(d.cached_count(), 0);
    }

    #[test]
    fn empty_document_has_single_empty_line() {
        let mut d = doc(b"", 16, TextEncoding::utf8());
        assert_eq!(d.line_count(), 1);
        assert_eq!(d.load_line(0).unwrap(), "");
    }

    #[test]
    fn utf8_bom_is_stripped_from_first_line_only() {
        let mut d = doc(b"\xEF\xBB\xBFhead\nbody", 4, TextEncoding::utf8());
        assert_eq!(d.load_line(0).unwrap(), "head");
        assert_eq!(d.load_line(1).unwrap(), "body");
    }

    #[test]
    fn utf16le_lines_decode() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("héllo\nwörld".encode_utf16().flat_map(|u| u.to_le_bytes()));
        let mut d = doc(&bytes, 3, TextEncoding::utf16le());
        assert_eq!(d.load_line(0).unwrap(), "héllo");
        assert_eq!(d.load_line(1).unwrap(), "wörld");
    }

    #[test]
    fn carriage_return_is_kept_in_cached_text() {
        let mut d = doc(b"dos\r\nline", 8, TextEncoding::utf8());
        assert_eq!(d.load_line(0).unwrap(), "dos\r");
    }

    #[test]
    fn load_range_populates_cache_and_skips_cached() {
        let mut d = doc(b"0\n1\n2\n3\n4", 2, TextEncoding::utf8());
        assert_eq!(d.load_range(1, 3).unwrap(), 3);
        assert_eq!(d.cached_line(1), Some("1"));
        assert_eq!(d.cached_line(3), Some("3"));
        assert_eq!(d.cached_line(0), None);

        assert_eq!(d.load_range(0, 4).unwrap(), 2);
        assert_eq!(d.cached_count(), 5);
    }

    #[test]
    fn load_range_clamps_end() {
        let mut d = doc(b"x\ny", 2, TextEncoding::utf8());
        assert_eq!(d.load_range(0, 100).unwrap(), 2);
        assert_eq!(d.cached_line(1), Some("y"));
    }

    #[test]
    fn load_range_inverted_or_past_end_is_noop() {
        let mut d = doc(b"x\ny\nz", 2, TextEncoding::utf8());
        assert_eq!(d.load_range(2, 1).unwrap(), 0);
        assert_eq!(d.load_range(7, 9).unwrap(), 0);
        assert_eq!(d.cached_count(), 0);
    }

    #[test]
    fn clear_cache_keeps_index() {
        let mut d = doc(b"x\ny", 2, TextEncoding::utf8());
        d.load_range(0, 1).unwrap();
        d.clear_cache();
        assert_eq!(d.cached_count(), 0);
        assert_eq!(d.line_count(), 2);
    }

    #[test]
    fn open_propagates_decode_errors() {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new("bad.txt", vec![0xFFu8, 0xFF]));
        let err = Document::open(source, 1, TextEncoding::utf8()).unwrap_err();
        assert!(matches!(err, IndexError::Decode { chunk: 0, .. }));
    }
}
