//! Surface integration tests
//!
//! Drive the App with synthetic terminal events, a manual clock and a
//! ratatui `TestBackend`, using the real `cl100k_base` vocabulary.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use masq_core::{Cl100kAdapter, Effect, ManualClock, MasqConfig, Mode};
use masq_tui::app::{PLACEHOLDER, TITLE};
use masq_tui::{App, Focus};

/// Longer than any scramble or reveal with default settings
const SETTLE: Duration = Duration::from_secs(5);

struct Harness {
    app: App,
    clock: ManualClock,
    terminal: Terminal<TestBackend>,
}

impl Harness {
    fn new(config: MasqConfig) -> Self {
        let clock = ManualClock::new();
        let tokenizer = Cl100kAdapter::new().expect("cl100k_base loads");
        let app = App::with_clock(config, tokenizer, Arc::new(clock.clone()));
        let terminal = Terminal::new(TestBackend::new(80, 24)).expect("test terminal");
        Self {
            app,
            clock,
            terminal,
        }
    }

    fn key(&mut self, code: KeyCode) {
        self.app
            .handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
    }

    fn submit(&mut self, text: &str) {
        self.type_str(text);
        self.key(KeyCode::Enter);
    }

    fn settle(&mut self) {
        self.app.update();
        self.clock.advance(SETTLE);
        self.app.update();
    }

    /// Draw a frame and return the screen as text, one line per row
    fn screen(&mut self) -> String {
        let app = &mut self.app;
        self.terminal.draw(|f| app.draw(f)).expect("draw");
        let buf = self.terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[test]
fn test_initial_screen() {
    let mut h = Harness::new(MasqConfig::default());
    h.clock.advance(SETTLE);
    h.app.update();

    let screen = h.screen();
    assert!(screen.contains(TITLE));
    assert!(screen.contains(PLACEHOLDER));
    assert_eq!(h.app.focus(), Focus::Input);
}

#[test]
fn test_processing_frame_shows_mode() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("15339 1917");

    assert!(h.app.has_pending());
    let screen = h.screen();
    assert!(screen.contains(Mode::Decode.progress_label()));
}

#[test]
fn test_decode_settles_on_text() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("15339 1917");
    h.settle();

    assert_eq!(h.app.focus(), Focus::Output);
    assert_eq!(h.app.displayed_output(), "hello world");

    let screen = h.screen();
    assert!(screen.contains("hello world"));
    assert!(screen.contains("decode · 2 tokens"));
    assert!(!screen.contains(PLACEHOLDER));
}

#[test]
fn test_encode_settles_on_ids() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("hello world");

    let screen = h.screen();
    assert!(screen.contains(Mode::Encode.progress_label()));

    h.settle();
    let screen = h.screen();
    assert!(screen.contains("15339 1917"));
    assert!(screen.contains("encode · 2 tokens"));
}

#[test]
fn test_invalid_token_shows_error() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("1 2 3 4 5 x");
    h.settle();

    assert_eq!(h.app.focus(), Focus::Input);
    assert!(h.app.conductor().result().is_none());

    let screen = h.screen();
    assert!(screen.contains("Invalid token: x"));
    assert!(screen.contains("1 2 3 4 5 x"));
}

#[test]
fn test_unknown_token_shows_error() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("4000000");
    h.settle();

    let screen = h.screen();
    assert!(screen.contains("Unknown token id: 4000000"));
}

#[test]
fn test_error_clears_on_next_submission() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("1 2 3 4 5 x");
    h.settle();
    assert!(h.app.conductor().error().is_some());

    h.key(KeyCode::Backspace);
    h.key(KeyCode::Backspace);
    h.key(KeyCode::Enter);
    h.settle();

    assert!(h.app.conductor().error().is_none());
    assert_eq!(h.app.focus(), Focus::Output);
}

#[test]
fn test_click_on_output_resets() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("15339 1917");
    h.settle();
    h.screen();

    let area = h.app.output_area();
    assert!(area.width > 0);

    h.app.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: area.x,
        row: area.y,
        modifiers: KeyModifiers::NONE,
    }));

    assert_eq!(h.app.focus(), Focus::Input);
    assert_eq!(h.app.conductor().input(), "");
    assert!(h.app.conductor().result().is_none());

    let screen = h.screen();
    assert!(screen.contains(PLACEHOLDER));
    assert!(!screen.contains("hello world"));
}

#[test]
fn test_click_outside_output_ignored() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("15339 1917");
    h.settle();
    h.screen();

    h.app.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    }));

    assert_eq!(h.app.focus(), Focus::Output);
}

#[test]
fn test_enter_on_output_resets() {
    let mut h = Harness::new(MasqConfig::default());
    h.submit("hello world");
    h.settle();

    h.key(KeyCode::Enter);
    assert_eq!(h.app.focus(), Focus::Input);
    assert_eq!(h.app.displayed_output(), "");

    // A fresh round-trip scrambles in from nothing
    h.submit("15339 1917");
    h.settle();
    assert_eq!(h.app.displayed_output(), "hello world");
}

#[test]
fn test_tab_toggles_info_overlay() {
    let mut h = Harness::new(MasqConfig::default());

    h.key(KeyCode::Tab);
    assert!(h.app.show_info());
    assert!(h.screen().contains("How it works"));

    h.key(KeyCode::Tab);
    assert!(!h.app.show_info());
    assert!(!h.screen().contains("How it works"));
}

#[test]
fn test_info_on_start() {
    let mut config = MasqConfig::default();
    config.show_info_on_start = true;
    let h = Harness::new(config);
    assert!(h.app.show_info());
}

#[test]
fn test_esc_quits() {
    let mut h = Harness::new(MasqConfig::default());
    assert!(h.app.is_running());
    h.key(KeyCode::Esc);
    assert!(!h.app.is_running());
}

#[test]
fn test_ctrl_c_quits() {
    let mut h = Harness::new(MasqConfig::default());
    h.app.handle_event(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(!h.app.is_running());
}

#[test]
fn test_reveal_effect() {
    let mut config = MasqConfig::default();
    config.effect = Effect::Reveal;
    let mut h = Harness::new(config);
    h.submit("15339 1917");
    h.app.update();

    // First frame: nothing revealed yet
    let screen = h.screen();
    assert!(!screen.contains("hello world"));
    assert!(h.app.is_animating());

    h.clock.advance(SETTLE);
    h.app.update();

    let screen = h.screen();
    assert!(screen.contains("hello world"));
    assert_eq!(h.app.displayed_output(), "hello world");
    assert!(!h.app.is_animating());
}

#[test]
fn test_resize_relayouts() {
    let mut h = Harness::new(MasqConfig::default());
    h.app.handle_event(Event::Resize(40, 12));
    assert_eq!(h.app.size(), (40, 12));

    h.terminal.backend_mut().resize(40, 12);
    h.clock.advance(SETTLE);
    h.app.update();
    let screen = h.screen();
    assert!(screen.contains(TITLE));
    assert_eq!(h.app.size(), (40, 12));
}
