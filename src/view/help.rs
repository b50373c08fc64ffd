//! Help overlay widget displaying keyboard shortcuts.
//!
//! Shows a centered modal overlay with all keyboard shortcuts grouped by category.
//! Triggered by '?' key, dismissed by 'Esc' or '?'.

use super::constants::{HELP_POPUP_HEIGHT_PERCENT, HELP_POPUP_WIDTH_PERCENT};
use super::styles::{MUTED_TEXT, SECTION_HEADER};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Shortcut table: (category, [(keys, description)]).
const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/↓", "Scroll down"),
            ("k/↑", "Scroll up"),
            ("h/←", "Scroll left (long lines)"),
            ("l/→", "Scroll right"),
            ("Ctrl+d/PgDn/Space", "Next page"),
            ("Ctrl+u/PgUp", "Previous page"),
            ("g/Home", "First line"),
            ("G/End", "Last page"),
        ],
    ),
    (
        "Reading",
        &[
            (":", "Go to line"),
            ("s", "Save reading position"),
            ("e", "Next encoding"),
            ("r", "Reload file"),
        ],
    ),
    (
        "Application",
        &[("?", "Toggle this help"), ("q/Ctrl+c", "Quit (saves position)")],
    ),
];

/// Render the help overlay centered on the screen.
pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let popup_area = centered_rect(HELP_POPUP_WIDTH_PERCENT, HELP_POPUP_HEIGHT_PERCENT, area);

    frame.render_widget(Clear, popup_area);

    let help_paragraph = Paragraph::new(build_help_content())
        .block(
            Block::default()
                .title(" Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(1),
        width: popup_area.width,
        height: 1,
    };

    let hint = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc or ? to close ",
        MUTED_TEXT.add_modifier(Modifier::DIM),
    )]))
    .alignment(Alignment::Center);

    frame.render_widget(hint, hint_area);
}

/// Calculate the centered rect for the help overlay.
///
/// Returns a Rect that is centered on the screen with the specified
/// percentage of width and height.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_width = area.width * percent_x / 100;
    let popup_height = area.height * percent_y / 100;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    Rect {
        x: area.x + popup_x,
        y: area.y + popup_y,
        width: popup_width,
        height: popup_height,
    }
}

fn build_help_content() -> Vec<Line<'static>> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let mut lines = Vec::new();
    for (i, (category, entries)) in SHORTCUTS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(*category, SECTION_HEADER)));
        for (keys, description) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<20}", keys), key_style),
                Span::styled(*description, desc_style),
            ]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(70, 80, area);
        assert_eq!(rect, Rect::new(15, 5, 70, 40));
    }

    #[test]
    fn centered_rect_handles_tiny_area() {
        let rect = centered_rect(70, 80, Rect::new(0, 0, 1, 1));
        assert_eq!(rect.width, 0);
        assert_eq!(rect.height, 0);
    }

    #[test]
    fn overlay_lists_reading_shortcuts() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(render_help_overlay).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Go to line"));
        assert!(text.contains("Save reading position"));
        assert!(text.contains("Press Esc or ? to close"));
    }

    #[test]
    fn every_category_has_a_header_line() {
        let content = build_help_content();
        for (category, _) in SHORTCUTS {
            assert!(
                content.iter().any(|line| line.to_string() == *category),
                "missing header {}",
                category
            );
        }
    }
}
