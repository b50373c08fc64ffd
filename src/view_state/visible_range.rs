//! Visible range calculation

use super::types::LineHeight;
use std::ops::RangeInclusive;

/// Inclusive range of 0-based lines to materialize around the viewport.
///
/// # Invariants
/// - `start <= end`
/// - `end < total_lines` of the document it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    /// First line (inclusive).
    pub start: usize,
    /// Last line (inclusive).
    pub end: usize,
}

impl VisibleRange {
    /// Number of lines in the range.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; an empty range is represented by `None`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether a line is inside the range.
    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }

    /// Iterate over the line numbers.
    pub fn lines(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Map a scroll position to the range of lines to load and render.
///
/// `start = max(0, floor(scroll / lh) - buffer)`,
/// `end = min(total - 1, floor((scroll + height) / lh) + buffer)`.
///
/// The line height is an estimate, so the mapping is consistent but not
/// pixel-exact. Returns `None` when `total_lines == 0`. `start` is clamped
/// to `end` when scrolled past the last line.
pub fn compute_visible_range(
    scroll_offset: u64,
    viewport_height: u64,
    line_height: LineHeight,
    buffer_lines: usize,
    total_lines: usize,
) -> Option<VisibleRange> {
    let last = total_lines.checked_sub(1)?;
    let lh = line_height.get();

    let first_visible = to_usize(scroll_offset / lh);
    let last_visible = to_usize(scroll_offset.saturating_add(viewport_height) / lh);

    let end = last_visible.saturating_add(buffer_lines).min(last);
    let start = first_visible.saturating_sub(buffer_lines).min(end);
    Some(VisibleRange { start, end })
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
