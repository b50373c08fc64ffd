//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod help;
mod layout;
mod line_prompt;
mod styles;
mod text;

pub use help::render_help_overlay;
pub use layout::{body_height, render_layout, LayoutState};
pub use line_prompt::{LinePrompt, LinePromptInput};
pub use text::visible_slice;

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{AppError, KeyAction};
use crate::progress::ProgressStore;
use crate::reader::{ReaderOptions, StatusKind, TextReader};
use crate::source::InputSource;
use constants::{HORIZONTAL_STEP, IDLE_POLL_INTERVAL};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<TuiError> for AppError {
    fn from(err: TuiError) -> Self {
        match err {
            TuiError::Io(e) => AppError::Terminal(e),
        }
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    reader: TextReader,
    key_bindings: KeyBindings,
    show_line_numbers: bool,
    help_visible: bool,
    prompt: Option<LinePrompt>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(reader: TextReader, show_line_numbers: bool) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, reader, show_line_numbers))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. The poll timeout is the time until the
    /// next debounced render or status fade, so an idle reader sleeps.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = self
                .reader
                .next_deadline(Instant::now())
                .map_or(IDLE_POLL_INTERVAL, |d| d.min(IDLE_POLL_INTERVAL));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, Instant::now()) {
                            return Ok(());
                        }
                        self.draw()?;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                        self.draw()?;
                    }
                    _ => {}
                }
            }

            if self.tick(Instant::now()) {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Application drawing to an existing terminal.
    pub fn with_terminal(terminal: Terminal<B>, reader: TextReader, show_line_numbers: bool) -> Self {
        Self {
            terminal,
            reader,
            key_bindings: KeyBindings::default(),
            show_line_numbers,
            help_visible: false,
            prompt: None,
        }
    }

    /// The reader session.
    pub fn reader(&self) -> &TextReader {
        &self.reader
    }

    /// The terminal, for inspecting the rendered buffer.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Whether the help overlay is open.
    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// The go-to-line prompt, if open.
    pub fn prompt(&self) -> Option<&LinePrompt> {
        self.prompt.as_ref()
    }

    /// Handle one key press. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if self.prompt.is_some() {
            self.handle_prompt_key(key, now);
            return false;
        }

        let action = self.key_bindings.get(key);

        if self.help_visible {
            match (key.code, action) {
                (KeyCode::Esc, _) | (_, Some(KeyAction::Help)) => self.help_visible = false,
                (_, Some(KeyAction::Quit)) => return self.quit(now),
                _ => {}
            }
            return false;
        }

        let Some(action) = action else {
            return false;
        };
        if action.is_vertical_scroll() && !self.reader.is_open() {
            return false;
        }

        match action {
            KeyAction::ScrollUp => self.reader.scroll_by(-1, now),
            KeyAction::ScrollDown => self.reader.scroll_by(1, now),
            KeyAction::ScrollLeft => self.reader.scroll_left(HORIZONTAL_STEP),
            KeyAction::ScrollRight => self.reader.scroll_right(HORIZONTAL_STEP),
            KeyAction::PageUp => self.reader.page_up(now),
            KeyAction::PageDown => self.reader.page_down(now),
            KeyAction::ScrollToTop => self.reader.scroll_to_top(now),
            KeyAction::ScrollToBottom => self.reader.scroll_to_bottom(now),
            KeyAction::GoToLine => {
                if self.reader.is_open() {
                    self.prompt = Some(LinePrompt::new());
                } else {
                    self.reader
                        .set_status("Open a file first", StatusKind::Info, now);
                }
            }
            KeyAction::SavePosition => match self.reader.save_position(now) {
                Ok(Some(line)) => debug!(line, "Position saved"),
                Ok(None) => self
                    .reader
                    .set_status("Open a file first", StatusKind::Info, now),
                // Already logged and shown in the status bar
                Err(_) => {}
            },
            KeyAction::CycleEncoding => {
                if let Err(e) = self.reader.cycle_encoding(now) {
                    warn!(encoding = %self.reader.encoding(), error = %e, "Encoding switch failed");
                }
            }
            KeyAction::Reload => {
                if let Err(e) = self.reader.reload(now) {
                    warn!(error = %e, "Reload failed");
                }
            }
            KeyAction::Help => self.help_visible = true,
            KeyAction::Quit => return self.quit(now),
        }
        false
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Char(ch) => prompt.push(ch),
            KeyCode::Enter => {
                let line = prompt.line();
                self.prompt = None;
                match line {
                    Some(line) => {
                        if let Err(e) = self.reader.go_to_line(line, now) {
                            self.reader.set_status(e.to_string(), StatusKind::Error, now);
                        }
                    }
                    None => self.reader.set_status(
                        "Please enter a valid line number",
                        StatusKind::Error,
                        now,
                    ),
                }
            }
            _ => {}
        }
    }

    /// Apply a due debounced render and fade expired status messages.
    /// Returns `true` if a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.reader.tick(now)
    }

    fn quit(&mut self, now: Instant) -> bool {
        info!(line = self.reader.current_line(), "Quitting");
        self.reader.reset_all(now);
        true
    }

    /// Render the current frame
    ///
    /// Syncs the viewport height to the body area first, which renders
    /// immediately when the terminal size changed.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let rows = body_height(size.height, self.prompt.is_some());
        let line_height = self.reader.viewport().line_height().get();
        self.reader
            .set_viewport_height(u64::from(rows) * line_height, Instant::now());

        let state = LayoutState {
            reader: &self.reader,
            show_line_numbers: self.show_line_numbers,
            prompt: self.prompt.as_ref(),
        };
        let help_visible = self.help_visible;
        self.terminal.draw(|frame| {
            render_layout(frame, &state);
            if help_visible {
                render_help_overlay(frame);
            }
        })?;
        Ok(())
    }
}

/// Initialize and run the TUI application with an input source
///
/// Opens the source, jumps to `start_line` if given (taking precedence
/// over a restored position), then runs the event loop and restores the
/// terminal even on error.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_source(
    input_source: InputSource,
    config: &ResolvedConfig,
    start_line: Option<usize>,
) -> Result<(), TuiError> {
    let progress = ProgressStore::in_dir(&config.progress_dir);
    let mut reader = TextReader::new(ReaderOptions::from(config), progress);
    let now = Instant::now();

    // A failed index keeps the source selected so another encoding can be tried.
    if let Err(e) = reader.open(input_source.into_shared(), now) {
        warn!(error = %e, "Initial indexing failed");
    } else if let Some(line) = start_line {
        if let Err(e) = reader.go_to_line(line, now) {
            reader.set_status(e.to_string(), StatusKind::Error, now);
        }
    }

    let mut app = TuiApp::new(reader, config.show_line_numbers)?;
    let result = app.run();

    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
pub fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
