//! Viewport controller: scroll position and navigation.

use super::types::LineHeight;
use super::visible_range::{compute_visible_range, VisibleRange};
use crate::model::error::ViewportError;

/// Scroll state of one reader view.
///
/// Scroll offsets are in the same units as [`LineHeight`]; with the default
/// line height of 1 they are terminal rows.
///
/// # Clamping
/// Relative moves (line, page) clamp to `[0, (total - 1) * lh]`.
/// [`ViewportState::go_to_line`] places the requested line at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportState {
    scroll_offset: u64,
    viewport_height: u64,
    line_height: LineHeight,
    buffer_lines: usize,
    horizontal_offset: usize,
}

impl ViewportState {
    /// Create a viewport at the top of the document.
    pub fn new(line_height: LineHeight, buffer_lines: usize) -> Self {
        Self {
            scroll_offset: 0,
            viewport_height: 0,
            line_height,
            buffer_lines,
            horizontal_offset: 0,
        }
    }

    /// Current vertical scroll offset.
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Viewport height in scroll units.
    pub fn viewport_height(&self) -> u64 {
        self.viewport_height
    }

    /// Set the viewport height (terminal resize).
    pub fn set_viewport_height(&mut self, height: u64) {
        self.viewport_height = height;
    }

    /// Line height estimate.
    pub fn line_height(&self) -> LineHeight {
        self.line_height
    }

    /// Extra lines loaded on each side of the visible lines.
    pub fn buffer_lines(&self) -> usize {
        self.buffer_lines
    }

    /// Columns skipped at the start of every rendered line.
    pub fn horizontal_offset(&self) -> usize {
        self.horizontal_offset
    }

    /// 1-based line at the top of the viewport.
    pub fn current_line(&self) -> usize {
        usize::try_from(self.scroll_offset / self.line_height.get())
            .unwrap_or(usize::MAX - 1)
            + 1
    }

    /// Visible range plus buffer for a document of `total_lines`.
    pub fn visible_range(&self, total_lines: usize) -> Option<VisibleRange> {
        compute_visible_range(
            self.scroll_offset,
            self.viewport_height,
            self.line_height,
            self.buffer_lines,
            total_lines,
        )
    }

    /// Largest offset reachable by relative scrolling.
    pub fn max_scroll_offset(&self, total_lines: usize) -> u64 {
        (total_lines.saturating_sub(1) as u64).saturating_mul(self.line_height.get())
    }

    /// Set the offset, clamped to the scrollable range.
    pub fn set_scroll_offset(&mut self, offset: u64, total_lines: usize) {
        self.scroll_offset = offset.min(self.max_scroll_offset(total_lines));
    }

    /// Scroll by whole lines (negative is up).
    pub fn scroll_by_lines(&mut self, delta: i64, total_lines: usize) {
        let amount = delta.unsigned_abs().saturating_mul(self.line_height.get());
        let target = if delta < 0 {
            self.scroll_offset.saturating_sub(amount)
        } else {
            self.scroll_offset.saturating_add(amount)
        };
        self.set_scroll_offset(target, total_lines);
    }

    /// Move up by one viewport height.
    pub fn page_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(self.viewport_height);
    }

    /// Move down by one viewport height.
    pub fn page_down(&mut self, total_lines: usize) {
        let target = self.scroll_offset.saturating_add(self.viewport_height);
        self.set_scroll_offset(target, total_lines);
    }

    /// Jump to the first line.
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Jump to the last page.
    pub fn scroll_to_bottom(&mut self, total_lines: usize) {
        let content = (total_lines as u64).saturating_mul(self.line_height.get());
        self.set_scroll_offset(content.saturating_sub(self.viewport_height), total_lines);
    }

    /// Put a 1-based line at the top of the viewport.
    ///
    /// # Errors
    ///
    /// `ViewportError::LineOutOfRange` if `line` is outside `[1, total_lines]`;
    /// the scroll offset is unchanged in that case.
    pub fn go_to_line(&mut self, line: usize, total_lines: usize) -> Result<(), ViewportError> {
        if line == 0 || line > total_lines {
            return Err(ViewportError::LineOutOfRange {
                line,
                total: total_lines,
            });
        }
        self.scroll_offset = ((line - 1) as u64).saturating_mul(self.line_height.get());
        Ok(())
    }

    /// Scroll long lines left by `columns`.
    pub fn scroll_left(&mut self, columns: usize) {
        self.horizontal_offset = self.horizontal_offset.saturating_sub(columns);
    }

    /// Scroll long lines right by `columns`.
    pub fn scroll_right(&mut self, columns: usize) {
        self.horizontal_offset = self.horizontal_offset.saturating_add(columns);
    }

    /// Back to the top-left corner.
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
        self.horizontal_offset = 0;
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(LineHeight::ONE, 500)
    }
}
