//! Chunked line indexer.
//!
//! Builds a [`LineIndex`] (byte offset of every line start) by reading the
//! source in fixed-size chunks, so the decoded text of the whole file never
//! has to be in memory at once.
//!
//! Each chunk goes through a streaming decoder for validation; a character
//! split across two chunks is completed by the next chunk. Line starts are
//! found by scanning the raw bytes for the encoding's line-feed code unit,
//! which gives byte offsets directly.

use crate::model::encoding::{LineFeed, TextEncoding};
use crate::model::error::IndexError;
use crate::source::ByteSource;
use encoding_rs::{Decoder, DecoderResult};
use std::ops::Range;
use tracing::debug;

/// Default chunk size: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// Upper bound on the scratch buffer used to validate a chunk.
const MAX_SCRATCH: usize = 64 * 1024;

/// Ordered byte offsets of every line start.
///
/// # Invariants
/// - `offsets[0] == 0`
/// - offsets are strictly increasing
/// - `line_count() == offsets.len() >= 1`
///
/// An empty source has exactly one (empty) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    offsets: Vec<u64>,
    source_len: u64,
    line_feed: LineFeed,
}

impl LineIndex {
    /// Line start offsets.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Total number of lines.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    /// Length of the indexed source in bytes.
    pub fn source_len(&self) -> u64 {
        self.source_len
    }

    /// Byte span of a 0-based line, excluding its line feed.
    ///
    /// Returns `None` if `line` is out of range.
    pub fn line_span(&self, line: usize) -> Option<Range<u64>> {
        let start = *self.offsets.get(line)?;
        let end = match self.offsets.get(line + 1) {
            Some(next) => next - self.line_feed.width(),
            None => self.source_len,
        };
        Some(start..end)
    }
}

/// Progress reported after each chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexProgress {
    /// Chunks processed so far.
    pub chunks: usize,
    /// Bytes processed so far.
    pub bytes_indexed: u64,
    /// Total source length.
    pub total_bytes: u64,
    /// Line starts found so far.
    pub lines: usize,
}

/// Build the line index of `source` with the given chunk size and encoding.
///
/// # Errors
///
/// - `IndexError::InvalidChunkSize` if `chunk_size == 0`
/// - `IndexError::Decode` naming the first chunk that is malformed under `encoding`
/// - `IndexError::Io` if reading the source fails
///
/// No partial index is returned on error.
pub fn build_index(
    source: &dyn ByteSource,
    chunk_size: u64,
    encoding: TextEncoding,
) -> Result<LineIndex, IndexError> {
    build_index_with_progress(source, chunk_size, encoding, |_| {})
}

/// [`build_index`] with a callback invoked after every chunk.
pub fn build_index_with_progress<F>(
    source: &dyn ByteSource,
    chunk_size: u64,
    encoding: TextEncoding,
    mut on_progress: F,
) -> Result<LineIndex, IndexError>
where
    F: FnMut(IndexProgress),
{
    if chunk_size == 0 {
        return Err(IndexError::InvalidChunkSize);
    }

    let total = source.len();
    let line_feed = encoding.line_feed();
    let mut offsets = vec![0];
    let mut scanner = LineFeedScanner::new(line_feed);
    let mut decoder = encoding.new_decoder();
    let mut scratch = String::new();

    let mut position = 0;
    let mut chunk = 0;
    while position < total {
        let end = position.saturating_add(chunk_size).min(total);
        let bytes = source.read_range(position..end)?;
        let last = end == total;

        if !validate_chunk(&mut decoder, &bytes, last, &mut scratch) {
            debug!(chunk, offset = position, encoding = %encoding, "chunk failed to decode");
            return Err(IndexError::Decode {
                chunk,
                offset: position,
                encoding: encoding.name(),
            });
        }

        scanner.feed(position, &bytes, &mut offsets);

        position = end;
        chunk += 1;
        on_progress(IndexProgress {
            chunks: chunk,
            bytes_indexed: position,
            total_bytes: total,
            lines: offsets.len(),
        });
    }

    Ok(LineIndex {
        offsets,
        source_len: total,
        line_feed,
    })
}

/// Run one chunk through the streaming decoder without replacement.
///
/// Returns `false` on malformed input. Decoded output is discarded.
fn validate_chunk(decoder: &mut Decoder, mut src: &[u8], last: bool, scratch: &mut String) -> bool {
    loop {
        scratch.clear();
        let wanted = decoder
            .max_utf8_buffer_length_without_replacement(src.len())
            .unwrap_or(MAX_SCRATCH);
        scratch.reserve(wanted.clamp(64, MAX_SCRATCH));

        let (result, read) = decoder.decode_to_string_without_replacement(src, scratch, last);
        match result {
            DecoderResult::InputEmpty => return true,
            DecoderResult::OutputFull => src = &src[read..],
            DecoderResult::Malformed(_, _) => return false,
        }
    }
}

/// Finds line-feed code units in a stream of chunks.
///
/// Code units are aligned to absolute offsets that are multiples of the
/// unit width; a unit split across chunks is carried over.
#[derive(Debug)]
struct LineFeedScanner {
    line_feed: LineFeed,
    pending: Vec<u8>,
}

impl LineFeedScanner {
    fn new(line_feed: LineFeed) -> Self {
        Self {
            line_feed,
            pending: Vec::with_capacity(2),
        }
    }

    /// Scan `bytes` starting at absolute offset `base`, pushing the offset
    /// after every line feed.
    fn feed(&mut self, base: u64, bytes: &[u8], offsets: &mut Vec<u64>) {
        let width = self.line_feed.width() as usize;

        if width == 1 {
            offsets.extend(
                bytes
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| **b == b'\n')
                    .map(|(i, _)| base + i as u64 + 1),
            );
            return;
        }

        let mut i = 0;
        if !self.pending.is_empty() {
            let need = (width - self.pending.len()).min(bytes.len());
            self.pending.extend_from_slice(&bytes[..need]);
            i = need;
            if self.pending.len() < width {
                return;
            }
            if self.line_feed.matches(&self.pending) {
                offsets.push(base + i as u64);
            }
            self.pending.clear();
        }

        while i + width <= bytes.len() {
            if self.line_feed.matches(&bytes[i..i + width]) {
                offsets.push(base + (i + width) as u64);
            }
            i += width;
        }
        self.pending.extend_from_slice(&bytes[i..]);
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
