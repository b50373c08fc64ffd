//! Reader session.
//!
//! A [`TextReader`] owns everything needed to show one source: the
//! [`Document`] (line index and cache), the viewport, the scroll debouncer
//! and the progress store. Several readers can coexist; nothing is global.

mod snapshot;
mod status;

pub use snapshot::RenderedSnapshot;
pub use status::{StatusKind, StatusMessage, STATUS_FADE};

use crate::config::ResolvedConfig;
use crate::document::Document;
use crate::index::DEFAULT_CHUNK_SIZE;
use crate::model::encoding::{detect_encoding, Detection, TextEncoding, DETECTION_SAMPLE_LEN};
use crate::model::error::{IndexError, ProgressError, ViewportError};
use crate::progress::ProgressStore;
use crate::source::{format_file_size, ByteSource};
use crate::view_state::{
    LineHeight, ScrollDebouncer, ViewportState, DEFAULT_SCROLL_DEBOUNCE,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Settings a reader needs, taken from the resolved config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Forced encoding, or fallback when detection is on.
    pub encoding: TextEncoding,
    /// Sniff the encoding on open.
    pub auto_detect_encoding: bool,
    /// Indexing chunk size in bytes.
    pub chunk_size: u64,
    /// Buffer lines around the viewport.
    pub buffer_lines: usize,
    /// Scroll debounce delay.
    pub scroll_debounce: Duration,
    /// Line height estimate.
    pub line_height: LineHeight,
    /// Restore saved position on open.
    pub restore_position: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::utf8(),
            auto_detect_encoding: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffer_lines: 500,
            scroll_debounce: DEFAULT_SCROLL_DEBOUNCE,
            line_height: LineHeight::ONE,
            restore_position: true,
        }
    }
}

impl From<&ResolvedConfig> for ReaderOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            encoding: config.encoding,
            auto_detect_encoding: config.auto_detect_encoding,
            chunk_size: config.chunk_size,
            buffer_lines: config.buffer_lines,
            scroll_debounce: config.scroll_debounce,
            line_height: config.line_height,
            restore_position: config.restore_position,
        }
    }
}

/// One reading session.
#[derive(Debug)]
pub struct TextReader {
    options: ReaderOptions,
    source: Option<Arc<dyn ByteSource>>,
    document: Option<Document>,
    encoding: TextEncoding,
    detection: Option<Detection>,
    viewport: ViewportState,
    debouncer: ScrollDebouncer,
    progress: ProgressStore,
    snapshot: Option<RenderedSnapshot>,
    status: Option<StatusMessage>,
}

impl TextReader {
    /// Reader with nothing open.
    pub fn new(options: ReaderOptions, progress: ProgressStore) -> Self {
        Self {
            viewport: ViewportState::new(options.line_height, options.buffer_lines),
            debouncer: ScrollDebouncer::new(options.scroll_debounce),
            encoding: options.encoding,
            options,
            source: None,
            document: None,
            detection: None,
            progress,
            snapshot: None,
            status: None,
        }
    }

    /// Open `source`: pick the encoding, build the index, render the first
    /// page and restore the saved position if enabled.
    ///
    /// Any previously open source is replaced without saving its position.
    ///
    /// # Errors
    ///
    /// Returns the `IndexError` if the source cannot be sampled or indexed.
    /// The new source stays selected so another encoding can be tried.
    pub fn open(&mut self, source: Arc<dyn ByteSource>, now: Instant) -> Result<(), IndexError> {
        self.clear_content();
        self.detection = None;
        self.source = Some(Arc::clone(&source));
        self.encoding = if self.options.auto_detect_encoding {
            let sample_end = source.len().min(DETECTION_SAMPLE_LEN as u64);
            let sample = match source.read_range(0..sample_end) {
                Ok(sample) => sample,
                Err(e) => {
                    warn!(file = %source.name(), error = %e, "Failed to read detection sample");
                    let e = IndexError::from(e);
                    self.set_status(e.to_string(), StatusKind::Error, now);
                    return Err(e);
                }
            };
            let detection = detect_encoding(&sample, self.options.encoding);
            debug!(encoding = %detection.encoding, reason = ?detection.reason, "Detected encoding");
            self.detection = Some(detection);
            detection.encoding
        } else {
            self.options.encoding
        };

        self.build(now)?;
        if self.options.restore_position {
            self.restore_position(now);
        }
        Ok(())
    }

    /// Switch encoding: drop the index and cache, then re-index.
    ///
    /// With nothing open the encoding is kept for the next [`TextReader::open`]
    /// only if detection is off.
    ///
    /// # Errors
    ///
    /// Returns the `IndexError` if the source cannot be indexed under `encoding`.
    pub fn set_encoding(&mut self, encoding: TextEncoding, now: Instant) -> Result<(), IndexError> {
        self.encoding = encoding;
        self.options.encoding = encoding;
        self.detection = None;
        if self.source.is_none() {
            return Ok(());
        }
        self.clear_content();
        self.build(now)
    }

    /// Switch to the next encoding in the cycle list.
    ///
    /// # Errors
    ///
    /// See [`TextReader::set_encoding`].
    pub fn cycle_encoding(&mut self, now: Instant) -> Result<(), IndexError> {
        self.set_encoding(self.encoding.next_in_cycle(), now)
    }

    /// Reopen the current source and re-index it with the current encoding,
    /// so a file that grew or shrank on disk is read at its new length.
    ///
    /// The scroll position is kept (clamped to the new line count).
    ///
    /// # Errors
    ///
    /// Returns the `IndexError` from reopening or rebuilding.
    pub fn reload(&mut self, now: Instant) -> Result<(), IndexError> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        match source.reopen() {
            Ok(Some(fresh)) => self.source = Some(fresh),
            Ok(None) => {}
            Err(e) => {
                warn!(file = %source.name(), error = %e, "Failed to reopen source");
                let e = IndexError::from(e);
                self.set_status(e.to_string(), StatusKind::Error, now);
                return Err(e);
            }
        }
        self.document = None;
        self.snapshot = None;
        self.debouncer.cancel();
        self.build(now)?;
        let offset = self.viewport.scroll_offset();
        self.render_at(offset, now);
        Ok(())
    }

    fn clear_content(&mut self) {
        self.document = None;
        self.snapshot = None;
        self.debouncer.cancel();
        self.viewport.reset();
    }

    fn build(&mut self, now: Instant) -> Result<(), IndexError> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        let name = source.name().to_string();
        let started = Instant::now();
        let result = Document::open_with_progress(
            source,
            self.options.chunk_size,
            self.encoding,
            |p| {
                debug!(
                    chunks = p.chunks,
                    bytes = p.bytes_indexed,
                    total = p.total_bytes,
                    lines = p.lines,
                    "Indexing"
                )
            },
        );

        match result {
            Ok(document) => {
                info!(
                    file = %name,
                    encoding = %self.encoding,
                    lines = document.line_count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Index complete"
                );
                self.set_status(
                    format!("Indexed {} lines ({})", document.line_count(), self.encoding),
                    StatusKind::Success,
                    now,
                );
                self.document = Some(document);
                self.render(now);
                Ok(())
            }
            Err(e) => {
                warn!(file = %name, error = %e, "Indexing failed");
                self.set_status(e.to_string(), StatusKind::Error, now);
                Err(e)
            }
        }
    }

    fn restore_position(&mut self, now: Instant) {
        let Some(source) = &self.source else {
            return;
        };
        let identity = source.identity();
        let total = self.total_lines();
        if let Some(line) = self.progress.restore(&identity, total) {
            if line > 1 && self.go_to_line(line, now).is_ok() {
                info!(file = %identity, line, "Restored reading position");
                self.set_status(
                    format!("Restored reading position: line {}", line),
                    StatusKind::Info,
                    now,
                );
            }
        }
    }

    /// Recompute the visible range at the current scroll offset, load it
    /// and replace the snapshot.
    fn render(&mut self, now: Instant) {
        let Some(document) = self.document.as_mut() else {
            self.snapshot = None;
            return;
        };
        let total = document.line_count();
        let Some(range) = self.viewport.visible_range(total) else {
            self.snapshot = None;
            return;
        };

        if let Err(e) = document.load_range(range.start, range.end) {
            warn!(error = %e, start = range.start, end = range.end, "Failed to load lines");
            self.status = Some(StatusMessage::new(e.to_string(), StatusKind::Error, now));
        }
        let lines = range
            .lines()
            .map(|line| document.cached_line(line).map(str::to_string))
            .collect();
        self.snapshot = Some(RenderedSnapshot::new(range, lines));
    }

    // ===== Scrolling =====

    /// Record a scroll to the current offset; the render is debounced.
    pub fn on_scroll(&mut self, now: Instant) {
        self.debouncer.schedule(self.viewport.scroll_offset(), now);
    }

    /// Scroll by whole lines (negative is up).
    pub fn scroll_by(&mut self, delta: i64, now: Instant) {
        let total = self.total_lines();
        self.viewport.scroll_by_lines(delta, total);
        self.on_scroll(now);
    }

    /// Previous page.
    pub fn page_up(&mut self, now: Instant) {
        self.viewport.page_up();
        self.on_scroll(now);
    }

    /// Next page.
    pub fn page_down(&mut self, now: Instant) {
        let total = self.total_lines();
        self.viewport.page_down(total);
        self.on_scroll(now);
    }

    /// First line.
    pub fn scroll_to_top(&mut self, now: Instant) {
        self.viewport.scroll_to_top();
        self.on_scroll(now);
    }

    /// Last page.
    pub fn scroll_to_bottom(&mut self, now: Instant) {
        let total = self.total_lines();
        self.viewport.scroll_to_bottom(total);
        self.on_scroll(now);
    }

    /// Scroll long lines left.
    pub fn scroll_left(&mut self, columns: usize) {
        self.viewport.scroll_left(columns);
    }

    /// Scroll long lines right.
    pub fn scroll_right(&mut self, columns: usize) {
        self.viewport.scroll_right(columns);
    }

    /// Put a 1-based line at the top and render immediately.
    ///
    /// # Errors
    ///
    /// `ViewportError::NoDocument` with nothing open,
    /// `ViewportError::LineOutOfRange` outside `[1, total_lines]`. The scroll
    /// position does not change on error.
    pub fn go_to_line(&mut self, line: usize, now: Instant) -> Result<(), ViewportError> {
        let total = self
            .document
            .as_ref()
            .map(Document::line_count)
            .ok_or(ViewportError::NoDocument)?;
        self.viewport.go_to_line(line, total)?;
        self.debouncer.cancel();
        self.render(now);
        Ok(())
    }

    /// Apply a pending debounced scroll and fade expired status messages.
    ///
    /// Returns `true` if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(offset) = self.debouncer.take_ready(now) {
            debug!(offset, "Rendering after scroll");
            self.render_at(offset, now);
            changed = true;
        }
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
            changed = true;
        }
        changed
    }

    fn render_at(&mut self, offset: u64, now: Instant) {
        let total = self.total_lines();
        self.viewport.set_scroll_offset(offset, total);
        self.render(now);
    }

    /// Time until [`TextReader::tick`] has work to do.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let scroll = self.debouncer.time_until_ready(now);
        let status = self.status.as_ref().and_then(|s| s.time_until_expiry(now));
        match (scroll, status) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Viewport height changed; renders immediately.
    pub fn set_viewport_height(&mut self, height: u64, now: Instant) {
        if self.viewport.viewport_height() != height {
            self.viewport.set_viewport_height(height);
            self.render(now);
        }
    }

    // ===== Progress =====

    /// Save the current line for this file.
    ///
    /// Returns the saved line, or `None` with nothing open. Failures are
    /// logged and shown in the status bar.
    ///
    /// # Errors
    ///
    /// Returns the `ProgressError` from the store.
    pub fn save_position(&mut self, now: Instant) -> Result<Option<usize>, ProgressError> {
        let Some(source) = &self.source else {
            return Ok(None);
        };
        if self.document.is_none() {
            return Ok(None);
        }
        let identity = source.identity();
        let line = self.viewport.current_line();

        match self.progress.save(&identity, line) {
            Ok(()) => {
                self.set_status(
                    format!("Reading position saved: line {}", line),
                    StatusKind::Success,
                    now,
                );
                Ok(Some(line))
            }
            Err(e) => {
                warn!(file = %identity, error = %e, "Failed to save reading position");
                self.set_status(
                    format!("Failed to save reading position: {}", e),
                    StatusKind::Error,
                    now,
                );
                Err(e)
            }
        }
    }

    /// Save the position, then close the source and clear all state.
    pub fn reset_all(&mut self, now: Instant) {
        // Failure is already logged and nothing remains to show it on.
        let _ = self.save_position(now);
        self.clear_content();
        self.source = None;
        self.detection = None;
        self.encoding = self.options.encoding;
        self.status = None;
    }

    // ===== Status =====

    /// Whether a document is indexed and viewable.
    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    /// Total lines, or 0 with nothing indexed.
    pub fn total_lines(&self) -> usize {
        self.document.as_ref().map_or(0, Document::line_count)
    }

    /// Number of cached lines.
    pub fn cached_lines(&self) -> usize {
        self.document.as_ref().map_or(0, Document::cached_count)
    }

    /// 1-based line at the top of the viewport.
    pub fn current_line(&self) -> usize {
        self.viewport.current_line()
    }

    /// Name of the open source.
    pub fn file_name(&self) -> Option<&str> {
        self.source.as_deref().map(|s| s.name())
    }

    /// Size of the open source in bytes.
    pub fn file_size(&self) -> Option<u64> {
        self.source.as_deref().map(|s| s.len())
    }

    /// Formatted size of the open source.
    pub fn formatted_size(&self) -> Option<String> {
        self.file_size().map(format_file_size)
    }

    /// Encoding in use.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// How the encoding was chosen on the last open, if detected.
    pub fn detection(&self) -> Option<Detection> {
        self.detection
    }

    /// Viewport state.
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Lines from the last render.
    pub fn snapshot(&self) -> Option<&RenderedSnapshot> {
        self.snapshot.as_ref()
    }

    /// Current status message.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Show a status message.
    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind, now: Instant) {
        self.status = Some(StatusMessage::new(text, kind, now));
    }

    /// Whether a debounced scroll is pending.
    pub fn scroll_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
