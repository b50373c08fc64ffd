//! Shared styles.

use crate::reader::StatusKind;
use ratatui::style::{Color, Modifier, Style};

/// Header bar: file name, size and encoding.
pub const HEADER: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Line-number gutter.
pub const GUTTER: Style = Style::new().fg(Color::DarkGray);

/// Placeholder for lines not loaded yet.
pub const PLACEHOLDER: Style = Style::new().fg(Color::DarkGray).add_modifier(Modifier::DIM);

/// Dim helper text.
pub const MUTED_TEXT: Style = Style::new().fg(Color::Gray);

/// Category headers in the help overlay.
pub const SECTION_HEADER: Style = Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD);

/// Go-to-line prompt.
pub const PROMPT: Style = Style::new().fg(Color::Black).bg(Color::Yellow);

/// Style for a status message of the given kind.
pub fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Info => Style::new().fg(Color::Blue),
        StatusKind::Success => Style::new().fg(Color::Green),
        StatusKind::Error => Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}
