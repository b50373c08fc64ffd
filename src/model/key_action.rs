//! Domain-level keyboard actions independent of key bindings.

/// Actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll up by one line. Default: k/↑
    ScrollUp,
    /// Scroll down by one line. Default: j/↓
    ScrollDown,
    /// Scroll long lines left. Default: h/←
    ScrollLeft,
    /// Scroll long lines right. Default: l/→
    ScrollRight,
    /// Previous page. Default: Ctrl+u/Page Up
    PageUp,
    /// Next page. Default: Ctrl+d/Page Down/Space
    PageDown,
    /// Jump to the first line. Default: g/Home
    ScrollToTop,
    /// Jump to the last line. Default: G/End
    ScrollToBottom,

    // Reading
    /// Open the go-to-line prompt. Default: :
    GoToLine,
    /// Save the current line as reading progress. Default: s
    SavePosition,
    /// Switch to the next encoding and re-index. Default: e
    CycleEncoding,
    /// Drop the index and cache and rebuild them. Default: r
    Reload,

    // Application
    /// Exit the reader, saving the position. Default: q/Ctrl+c
    Quit,
    /// Show help overlay. Default: ?
    Help,
}

impl KeyAction {
    /// Whether this action moves the vertical scroll position.
    pub fn is_vertical_scroll(self) -> bool {
        matches!(
            self,
            KeyAction::ScrollUp
                | KeyAction::ScrollDown
                | KeyAction::PageUp
                | KeyAction::PageDown
                | KeyAction::ScrollToTop
                | KeyAction::ScrollToBottom
        )
    }
}
