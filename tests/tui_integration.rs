//! End-to-end reader sessions on a test backend.
//!
//! These tests drive [`TuiApp`] with key events against real files and a
//! real progress directory, without requiring an actual terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use txtview::model::TextEncoding;
use txtview::progress::ProgressStore;
use txtview::reader::{ReaderOptions, StatusKind, TextReader};
use txtview::source::{ByteSource, FileSource};
use txtview::view::TuiApp;

struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("txtview_it_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn progress_dir(&self) -> PathBuf {
        self.dir.join("progress")
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn launch(path: &Path, progress_dir: &Path, options: ReaderOptions) -> TuiApp<TestBackend> {
    let mut reader = TextReader::new(options, ProgressStore::in_dir(progress_dir));
    let source: Arc<dyn ByteSource> = Arc::new(FileSource::open(path).unwrap());
    let _ = reader.open(source, Instant::now());

    let terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
    let mut app = TuiApp::with_terminal(terminal, reader, true);
    app.draw().unwrap();
    app
}

fn key(app: &mut TuiApp<TestBackend>, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
}

fn screen(app: &TuiApp<TestBackend>) -> String {
    let buffer = app.terminal().backend().buffer();
    let area = buffer.area;
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn book(lines: usize) -> String {
    (1..=lines)
        .map(|i| format!("chapter line {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn reading_position_survives_restart() {
    let fx = Fixture::new("restart");
    let path = fx.write("novel.txt", book(500).as_bytes());

    let mut app = launch(&path, &fx.progress_dir(), ReaderOptions::default());
    key(&mut app, KeyCode::Char(':'));
    for ch in "240".chars() {
        key(&mut app, KeyCode::Char(ch));
    }
    key(&mut app, KeyCode::Enter);
    assert!(key(&mut app, KeyCode::Char('q')));

    let app = launch(&path, &fx.progress_dir(), ReaderOptions::default());
    assert_eq!(app.reader().current_line(), 240);
    let status = app.reader().status().unwrap();
    assert_eq!(status.kind, StatusKind::Info);
    assert!(screen(&app).contains("chapter line 240"));
}

#[test]
fn restore_can_be_disabled() {
    let fx = Fixture::new("no_restore");
    let path = fx.write("novel.txt", book(100).as_bytes());

    let mut app = launch(&path, &fx.progress_dir(), ReaderOptions::default());
    key(&mut app, KeyCode::End);
    key(&mut app, KeyCode::Char('q'));

    let options = ReaderOptions {
        restore_position: false,
        ..ReaderOptions::default()
    };
    let app = launch(&path, &fx.progress_dir(), options);
    assert_eq!(app.reader().current_line(), 1);
}

#[test]
fn changed_file_does_not_restore() {
    let fx = Fixture::new("changed");
    let path = fx.write("novel.txt", book(100).as_bytes());

    let mut app = launch(&path, &fx.progress_dir(), ReaderOptions::default());
    key(&mut app, KeyCode::End);
    key(&mut app, KeyCode::Char('q'));

    fx.write("novel.txt", book(101).as_bytes());
    let app = launch(&path, &fx.progress_dir(), ReaderOptions::default());
    assert_eq!(app.reader().current_line(), 1);
}

#[test]
fn gbk_file_is_detected_and_rendered() {
    let fx = Fixture::new("gbk");
    let (bytes, _, _) = encoding_rs::GBK.encode("第一章 开始\n第二章 继续\n第三章 结束");
    let path = fx.write("story.txt", &bytes);

    let app = launch(&path, &fx.progress_dir(), ReaderOptions::default());

    assert_eq!(app.reader().encoding(), TextEncoding::gbk());
    assert_eq!(app.reader().total_lines(), 3);
    let text = screen(&app);
    assert!(text.contains("GBK"), "{}", text);
}

#[test]
fn wrong_forced_encoding_can_be_cycled_away() {
    let fx = Fixture::new("cycle");
    let utf16: Vec<u8> = "hello\nworld"
        .encode_utf16()
        .flat_map(|u| u.to_le_bytes())
        .collect();
    let path = fx.write("wide.txt", &utf16);

    let options = ReaderOptions {
        encoding: TextEncoding::big5(),
        auto_detect_encoding: false,
        ..ReaderOptions::default()
    };
    let mut app = launch(&path, &fx.progress_dir(), options);

    // BIG5 -> UTF-16LE
    key(&mut app, KeyCode::Char('e'));
    assert_eq!(app.reader().encoding(), TextEncoding::utf16le());
    assert!(app.reader().is_open());
    assert_eq!(app.reader().total_lines(), 2);
    app.draw().unwrap();
    assert!(screen(&app).contains("world"));
}

#[test]
fn malformed_utf8_reports_error_without_exiting() {
    let fx = Fixture::new("malformed");
    let path = fx.write("broken.txt", &[b'o', b'k', b'\n', 0xFF, 0xFE, 0x00, 0xC3]);

    let options = ReaderOptions {
        auto_detect_encoding: false,
        ..ReaderOptions::default()
    };
    let mut app = launch(&path, &fx.progress_dir(), options);

    assert!(!app.reader().is_open());
    assert_eq!(app.reader().status().unwrap().kind, StatusKind::Error);
    assert!(!key(&mut app, KeyCode::Char('j')));
    app.draw().unwrap();
    assert!(screen(&app).contains("Nothing to show"));
}

#[test]
fn rapid_scrolling_renders_once_after_debounce() {
    let fx = Fixture::new("debounce");
    let path = fx.write("long.txt", book(2_000).as_bytes());

    let options = ReaderOptions {
        buffer_lines: 20,
        ..ReaderOptions::default()
    };
    let mut app = launch(&path, &fx.progress_dir(), options);
    let cached_before = app.reader().cached_lines();

    for _ in 0..30 {
        key(&mut app, KeyCode::PageDown);
    }
    assert!(app.reader().scroll_pending());
    assert_eq!(app.reader().cached_lines(), cached_before);

    app.tick(Instant::now() + Duration::from_millis(200));
    app.draw().unwrap();

    assert!(!app.reader().scroll_pending());
    assert_eq!(app.reader().current_line(), 301);
    assert!(screen(&app).contains("chapter line 301"));
}

#[test]
fn empty_file_has_one_line() {
    let fx = Fixture::new("empty");
    let path = fx.write("empty.txt", b"");

    let app = launch(&path, &fx.progress_dir(), ReaderOptions::default());

    assert_eq!(app.reader().total_lines(), 1);
    assert!(screen(&app).contains("0 Bytes"));
}

#[test]
fn crlf_file_renders_without_carriage_returns() {
    let fx = Fixture::new("crlf");
    let path = fx.write("dos.txt", b"first\r\nsecond\r\n");

    let app = launch(&path, &fx.progress_dir(), ReaderOptions::default());

    assert_eq!(app.reader().total_lines(), 3);
    let text = screen(&app);
    assert!(text.contains("1 │ first"), "{}", text);
    assert!(!text.contains('\r'));
}
