//! Go-to-line prompt.

use super::styles::PROMPT;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Digits typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePrompt {
    input: String,
}

impl LinePrompt {
    /// Empty prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Append a character; only ASCII digits are accepted.
    pub fn push(&mut self, ch: char) {
        if ch.is_ascii_digit() && self.input.len() < 20 {
            self.input.push(ch);
        }
    }

    /// Remove the last character.
    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// The entered line number, if the input is a number.
    pub fn line(&self) -> Option<usize> {
        self.input.parse().ok()
    }
}

/// Renders a [`LinePrompt`] as a single line.
pub struct LinePromptInput<'a> {
    prompt: &'a LinePrompt,
    total_lines: usize,
}

impl<'a> LinePromptInput<'a> {
    /// Widget for `prompt`; `total_lines` is shown as the valid range.
    pub fn new(prompt: &'a LinePrompt, total_lines: usize) -> Self {
        Self {
            prompt,
            total_lines,
        }
    }
}

impl Widget for LinePromptInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::raw(format!(" Go to line (1-{}): ", self.total_lines)),
            Span::raw(self.prompt.input().to_string()),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ]);
        Paragraph::new(line).style(PROMPT).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn accepts_only_digits() {
        let mut prompt = LinePrompt::new();
        for ch in "4a2-".chars() {
            prompt.push(ch);
        }
        assert_eq!(prompt.input(), "42");
        assert_eq!(prompt.line(), Some(42));
    }

    #[test]
    fn backspace_removes_last_digit() {
        let mut prompt = LinePrompt::new();
        prompt.push('1');
        prompt.push('2');
        prompt.backspace();
        assert_eq!(prompt.line(), Some(1));
        prompt.backspace();
        prompt.backspace();
        assert_eq!(prompt.line(), None);
    }

    #[test]
    fn renders_range_and_input() {
        let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
        let mut prompt = LinePrompt::new();
        prompt.push('7');

        terminal
            .draw(|frame| {
                frame.render_widget(LinePromptInput::new(&prompt, 120), frame.area());
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Go to line (1-120): 7"), "got {:?}", text);
    }
}
