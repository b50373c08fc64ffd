//! The set of lines last handed to the renderer.

use crate::view_state::VisibleRange;

/// Lines materialized for one render pass.
///
/// Replaced wholesale on every render; a line outside the snapshot has no
/// text until the next render includes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSnapshot {
    range: VisibleRange,
    lines: Vec<Option<String>>,
}

impl RenderedSnapshot {
    /// Snapshot of `range`; `lines[i]` is line `range.start + i`.
    pub(crate) fn new(range: VisibleRange, lines: Vec<Option<String>>) -> Self {
        Self { range, lines }
    }

    /// Lines covered by this snapshot.
    pub fn range(&self) -> VisibleRange {
        self.range
    }

    /// Text of a 0-based line, if it is part of the snapshot and loaded.
    pub fn line(&self, line: usize) -> Option<&str> {
        if !self.range.contains(line) {
            return None;
        }
        self.lines.get(line - self.range.start)?.as_deref()
    }
}
