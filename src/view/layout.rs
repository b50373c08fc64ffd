//! Screen layout: header, text body with line-number gutter, optional
//! go-to-line prompt, status bar.

use super::constants::{HEADER_HEIGHT, PROMPT_HEIGHT, STATUS_BAR_HEIGHT};
use super::line_prompt::{LinePrompt, LinePromptInput};
use super::styles::{self, GUTTER, HEADER, MUTED_TEXT, PLACEHOLDER};
use super::text::visible_slice;
use crate::reader::TextReader;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the layout needs to draw one frame.
pub struct LayoutState<'a> {
    /// Reader session to draw.
    pub reader: &'a TextReader,
    /// Draw the line-number gutter.
    pub show_line_numbers: bool,
    /// Open go-to-line prompt, if any.
    pub prompt: Option<&'a LinePrompt>,
}

/// Rows available for text in a terminal of `terminal_height` rows.
pub fn body_height(terminal_height: u16, prompt_open: bool) -> u16 {
    let prompt = if prompt_open { PROMPT_HEIGHT } else { 0 };
    terminal_height.saturating_sub(HEADER_HEIGHT + STATUS_BAR_HEIGHT + prompt)
}

/// Render the full screen.
pub fn render_layout(frame: &mut Frame, state: &LayoutState<'_>) {
    let prompt_height = if state.prompt.is_some() { PROMPT_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(prompt_height),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state.reader);
    render_body(frame, chunks[1], state);
    if let Some(prompt) = state.prompt {
        frame.render_widget(
            LinePromptInput::new(prompt, state.reader.total_lines()),
            chunks[2],
        );
    }
    render_status_bar(frame, chunks[3], state.reader);
}

/// Header: file name, formatted size, encoding.
fn render_header(frame: &mut Frame, area: Rect, reader: &TextReader) {
    let text = match (reader.file_name(), reader.formatted_size()) {
        (Some(name), Some(size)) => format!(" {} | {} | {}", name, size, reader.encoding()),
        _ => " txtview | no file open".to_string(),
    };
    frame.render_widget(Paragraph::new(Line::from(text)).style(HEADER), area);
}

/// Width of the gutter for a document of `total_lines` lines, including
/// the separator.
fn gutter_width(total_lines: usize) -> usize {
    total_lines.max(1).to_string().len() + 3
}

/// Text rows starting at the viewport's current line. Rows whose line is
/// not part of the last rendered snapshot show a placeholder until the
/// debounced render lands.
fn render_body(frame: &mut Frame, area: Rect, state: &LayoutState<'_>) {
    let reader = state.reader;
    let total = reader.total_lines();
    if total == 0 {
        frame.render_widget(
            Paragraph::new(Line::styled(" Nothing to show", MUTED_TEXT)),
            area,
        );
        return;
    }

    let gutter = if state.show_line_numbers {
        gutter_width(total)
    } else {
        0
    };
    let text_width = (area.width as usize).saturating_sub(gutter);
    let skip = reader.viewport().horizontal_offset();
    let first = reader.current_line() - 1;
    let snapshot = reader.snapshot();

    let lines: Vec<Line> = (first..first + area.height as usize)
        .take_while(|&line| line < total)
        .map(|line| {
            let text = match snapshot.and_then(|s| s.line(line)) {
                Some(t) => Span::raw(visible_slice(t, skip, text_width)),
                None => Span::styled("…", PLACEHOLDER),
            };
            let mut spans = Vec::with_capacity(2);
            if state.show_line_numbers {
                spans.push(Span::styled(
                    format!("{:>w$} │ ", line + 1, w = gutter - 3),
                    GUTTER,
                ));
            }
            spans.push(text);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Status bar: totals and the current status message.
fn render_status_bar(frame: &mut Frame, area: Rect, reader: &TextReader) {
    let mut spans = vec![Span::styled(
        format!(
            " Total: {} | Loaded: {} | Line: {} ",
            reader.total_lines(),
            reader.cached_lines(),
            reader.current_line()
        ),
        MUTED_TEXT,
    )];
    if let Some(status) = reader.status() {
        spans.push(Span::styled(
            format!(" {}", status.text),
            styles::status_style(status.kind),
        ));
    } else {
        spans.push(Span::styled(" ?: help  q: quit", MUTED_TEXT));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
