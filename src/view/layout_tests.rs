//! Rendering tests for the screen layout.

use super::*;
use crate::progress::ProgressStore;
use crate::reader::ReaderOptions;
use crate::source::{ByteSource, MemorySource};
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use std::time::Instant;

fn reader_with(text: &str, height: u64) -> TextReader {
    let mut reader = TextReader::new(
        ReaderOptions {
            buffer_lines: 1,
            ..ReaderOptions::default()
        },
        ProgressStore::in_memory(),
    );
    let now = Instant::now();
    reader.set_viewport_height(height, now);
    let source: Arc<dyn ByteSource> =
        Arc::new(MemorySource::new("notes.txt", text.as_bytes().to_vec()));
    reader.open(source, now).unwrap();
    reader
}

fn draw(state: &LayoutState<'_>, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| render_layout(frame, state)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect()
}

#[test]
fn body_height_subtracts_bars_and_prompt() {
    assert_eq!(body_height(24, false), 22);
    assert_eq!(body_height(24, true), 21);
    assert_eq!(body_height(1, true), 0);
}

#[test]
fn gutter_width_tracks_digit_count() {
    assert_eq!(gutter_width(9), 4);
    assert_eq!(gutter_width(10), 5);
    assert_eq!(gutter_width(0), 4);
}

#[test]
fn renders_header_lines_and_status() {
    let reader = reader_with("alpha\nbeta\ngamma", 3);
    let state = LayoutState {
        reader: &reader,
        show_line_numbers: true,
        prompt: None,
    };

    let rows = draw(&state, 40, 5);

    assert!(rows[0].contains("notes.txt | 16 Bytes | UTF-8"), "{:?}", rows[0]);
    assert!(rows[1].starts_with("1 │ alpha"), "{:?}", rows[1]);
    assert!(rows[3].starts_with("3 │ gamma"), "{:?}", rows[3]);
    assert!(rows[4].contains("Total: 3 | Loaded: 3 | Line: 1"), "{:?}", rows[4]);
}

#[test]
fn line_numbers_can_be_hidden() {
    let reader = reader_with("alpha\nbeta", 2);
    let state = LayoutState {
        reader: &reader,
        show_line_numbers: false,
        prompt: None,
    };

    let rows = draw(&state, 20, 4);
    assert!(rows[1].starts_with("alpha"), "{:?}", rows[1]);
}

#[test]
fn prompt_row_appears_above_status_bar() {
    let reader = reader_with("a\nb\nc", 2);
    let mut prompt = LinePrompt::new();
    prompt.push('2');
    let state = LayoutState {
        reader: &reader,
        show_line_numbers: true,
        prompt: Some(&prompt),
    };

    let rows = draw(&state, 40, 5);
    assert!(rows[3].contains("Go to line (1-3): 2"), "{:?}", rows[3]);
    assert!(rows[4].contains("Total: 3"), "{:?}", rows[4]);
}

#[test]
fn empty_reader_shows_placeholder() {
    let reader = TextReader::new(ReaderOptions::default(), ProgressStore::in_memory());
    let state = LayoutState {
        reader: &reader,
        show_line_numbers: true,
        prompt: None,
    };

    let rows = draw(&state, 40, 4);
    assert!(rows[0].contains("no file open"));
    assert!(rows[1].contains("Nothing to show"));
}
