//! Main Application
//!
//! The App struct manages the TUI lifecycle:
//! - Event loop (keyboard, mouse, resize)
//! - Conductor for classification and conversion
//! - Scramble / reveal animators for the result and title
//!
//! The App never reads the wall clock directly. Every animation update takes
//! a reading from the injected [`Clock`], so tests drive it with a
//! [`masq_core::ManualClock`] and a ratatui `TestBackend`.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use masq_core::{
    Cl100kAdapter, Clock, Conductor, ConductorState, Effect, MasqConfig, Mode, RevealAnimator,
    ScrambleAnimator, Submission, SystemClock, TokenizerAdapter,
};

use crate::theme;
use crate::widgets::{layout_rows, wrap_lines, RevealText, TextBlock, TextBlockState};

/// Banner revealed on startup
pub const TITLE: &str = "TOKEN MASQ";

/// Shown in an empty input
pub const PLACEHOLDER: &str = "Enter tokens or text...";

/// Frame interval when nothing is moving
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Maximum width of the centered body
const MAX_BODY_WIDTH: u16 = 96;

/// Rows kept for the title, gaps, error and status lines
const CHROME_ROWS: u16 = 8;

/// Input box rows including borders (grows with long input)
const MIN_INPUT_HEIGHT: u16 = 3;
const MAX_INPUT_HEIGHT: u16 = 8;

/// Which part of the body has the keyboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// Typing into the input box
    Input,
    /// A result is on screen
    Output,
}

/// Main application state
pub struct App<T: TokenizerAdapter = Cl100kAdapter> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Resolved configuration
    config: MasqConfig,
    /// Time source for every animation
    clock: Arc<dyn Clock>,

    // === Conductor Integration ===
    /// Input, result and error
    conductor: Conductor<T>,
    /// Mode of a submission waiting for its processing frame to be drawn
    pending: Option<Mode>,

    // === Animation ===
    /// Result scramble
    scramble: ScrambleAnimator,
    /// Result reveal
    reveal: RevealAnimator,
    /// Title reveal
    title: RevealAnimator,

    // === UI State ===
    focus: Focus,
    show_info: bool,
    /// Output region from the last draw (mouse hit-testing)
    output_area: Rect,
    output_state: TextBlockState,
    /// Terminal size
    size: (u16, u16),
}

impl<T: TokenizerAdapter> App<T> {
    /// Create a new App on the system clock
    pub fn new(config: MasqConfig, tokenizer: T) -> Self {
        Self::with_clock(config, tokenizer, Arc::new(SystemClock::new()))
    }

    /// Create a new App on a specific clock
    pub fn with_clock(config: MasqConfig, tokenizer: T, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();

        let mut title = RevealAnimator::new(config.reveal);
        title.start(TITLE, now);

        tracing::debug!(
            effect = %config.effect,
            tokenizer = tokenizer.name(),
            "App created"
        );

        Self {
            running: true,
            scramble: ScrambleAnimator::new(config.scramble.clone()),
            reveal: RevealAnimator::new(config.reveal),
            title,
            show_info: config.show_info_on_start,
            config,
            clock,
            conductor: Conductor::new(tokenizer),
            pending: None,
            focus: Focus::Input,
            output_area: Rect::default(),
            output_state: TextBlockState::default(),
            size: (0, 0),
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so the title starts revealing
        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            let tick = self.tick_interval();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                _ = tokio::time::sleep(tick) => {}
            }

            // Show the processing status before the conversion blocks the loop
            if self.pending.is_some() {
                terminal.draw(|frame| self.draw(frame))?;
            }

            self.update();
            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Frame interval for the next loop iteration
    pub fn tick_interval(&self) -> Duration {
        if self.pending.is_some() || self.is_animating() {
            self.config.tick
        } else {
            IDLE_TICK
        }
    }

    /// Whether any effect still needs frames
    pub fn is_animating(&self) -> bool {
        let now = self.clock.now();
        self.scramble.is_animating() || self.reveal.is_animating(now) || self.title.is_animating(now)
    }

    /// Dispatch a terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.running = false;
                return;
            }
            KeyCode::Esc => {
                if self.show_info {
                    self.show_info = false;
                } else {
                    self.running = false;
                }
                return;
            }
            KeyCode::Tab | KeyCode::F(1) => {
                self.show_info = !self.show_info;
                return;
            }
            _ => {}
        }

        // The overlay swallows everything else
        if self.show_info {
            if key.code == KeyCode::Enter {
                self.show_info = false;
            }
            return;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key, ctrl),
            Focus::Output => self.handle_output_key(key, ctrl),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Enter => {
                if let Some(mode) = self.conductor.begin_submission() {
                    tracing::info!(mode = %mode, "Submitting");
                    self.pending = Some(mode);
                }
            }
            KeyCode::Char('u') if ctrl => self.conductor.clear_input(),
            KeyCode::Char(c) if !ctrl => self.conductor.push_char(c),
            KeyCode::Backspace => self.conductor.pop_char(),
            _ => {}
        }
    }

    fn handle_output_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Enter | KeyCode::Backspace => self.reset(),
            KeyCode::Char(c) if !ctrl => {
                // Typing over a result starts the next round-trip
                self.reset();
                self.conductor.push_char(c);
            }
            KeyCode::PageUp => {
                let page = self.output_area.height.max(1) as i32;
                self.output_state.scroll(-page);
            }
            KeyCode::PageDown => {
                let page = self.output_area.height.max(1) as i32;
                self.output_state.scroll(page);
            }
            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .output_area
                    .contains(Position::new(mouse.column, mouse.row));
                if hit && self.focus == Focus::Output && !self.show_info {
                    self.reset();
                }
            }
            MouseEventKind::ScrollUp if self.focus == Focus::Output => {
                self.output_state.scroll(-3);
            }
            MouseEventKind::ScrollDown if self.focus == Focus::Output => {
                self.output_state.scroll(3);
            }
            _ => {}
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "Terminal resized");
        self.size = (width, height);
    }

    /// Finish pending work and advance animations
    pub fn update(&mut self) {
        let now = self.clock.now();

        if self.pending.take().is_some() {
            match self.conductor.complete_submission() {
                Submission::Converted(conversion) => {
                    tracing::info!(
                        mode = %conversion.mode,
                        tokens = conversion.token_count,
                        "Showing result"
                    );
                    self.show_result(&conversion.output, now);
                }
                Submission::Failed(e) => {
                    tracing::debug!(error = %e, "Submission failed");
                    self.focus = Focus::Input;
                }
                Submission::Skipped => {}
            }
        }

        self.title.tick(now);
        self.reveal.tick(now);
        self.scramble.tick(now);
    }

    fn show_result(&mut self, output: &str, now: Duration) {
        self.focus = Focus::Output;
        self.output_state.scroll_to_top();

        match self.config.effect {
            Effect::Scramble => self.scramble.retarget(output, now),
            Effect::Reveal => self.reveal.start(output, now),
        }
    }

    /// Clear input, result and effects; focus back on the input
    pub fn reset(&mut self) {
        tracing::debug!("Reset");
        self.conductor.reset();
        self.pending = None;
        self.scramble.clear();
        self.reveal.clear();
        self.output_state.scroll_to_top();
        self.output_area = Rect::default();
        self.focus = Focus::Input;
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the UI
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.size = (area.width, area.height);
        let now = self.clock.now();

        frame.render_widget(Block::default().bg(theme::BACKGROUND), area);

        let body_width = area.width.saturating_sub(4).min(MAX_BODY_WIDTH).max(1);
        let max_body_height = area.height.saturating_sub(CHROME_ROWS).max(1);
        let body_height = match self.focus {
            Focus::Input => self.input_height(body_width).min(max_body_height),
            Focus::Output => self.output_height(body_width, now).min(max_body_height),
        };

        let [_, title_area, _, body_row, error_row, _, status_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(body_height),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let body_area = center_horizontally(body_row, body_width);
        let error_area = center_horizontally(error_row, body_width);

        let title_cells = self.title.cells(now);
        frame.render_widget(
            RevealText::new(&title_cells)
                .color(theme::BRIGHT)
                .modifier(Modifier::BOLD)
                .centered(),
            title_area,
        );

        match self.focus {
            Focus::Input => {
                self.output_area = Rect::default();
                self.draw_input(frame, body_area);
            }
            Focus::Output => {
                self.output_area = body_area;
                self.draw_output(frame, body_area, now);
            }
        }

        if let Some(error) = self.conductor.error() {
            frame.render_widget(
                Paragraph::new(Line::from(error.to_string()).centered())
                    .style(theme::error_style())
                    .wrap(Wrap { trim: true }),
                error_area,
            );
        }

        self.draw_status(frame, status_area);

        if self.show_info {
            draw_info(frame, area);
        }
    }

    fn input_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2).max(1) as usize;
        // "> " prompt plus trailing cursor
        let used = self.conductor.input().width() + 3;
        let lines = used.div_ceil(inner) + 2;
        lines.clamp(MIN_INPUT_HEIGHT as usize, MAX_INPUT_HEIGHT as usize) as u16
    }

    fn output_height(&self, width: u16, now: Duration) -> u16 {
        let lines = match self.config.effect {
            Effect::Scramble => wrap_lines(self.scramble.target(), width as usize).len(),
            // One spare row for characters still rising into place
            Effect::Reveal => layout_rows(&self.reveal.cells(now), width).len() + 1,
        };
        u16::try_from(lines).unwrap_or(u16::MAX).max(1)
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect) {
        let processing = self.conductor.is_processing();
        let input = self.conductor.input();

        let mut spans = vec![Span::styled("> ", theme::chrome_style())];
        if input.is_empty() && !processing {
            spans.push(Span::styled("_", theme::input_style()));
            spans.push(Span::styled(PLACEHOLDER, theme::placeholder_style()));
        } else if processing {
            spans.push(Span::styled(input.to_string(), theme::chrome_style()));
        } else {
            spans.push(Span::styled(input.to_string(), theme::input_style()));
            spans.push(Span::styled("_", theme::input_style()));
        }

        let block = Block::bordered().border_style(theme::chrome_style());
        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .block(block)
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn draw_output(&mut self, frame: &mut Frame, area: Rect, now: Duration) {
        match self.config.effect {
            Effect::Scramble => {
                frame.render_stateful_widget(
                    TextBlock::new(self.scramble.displayed())
                        .style(theme::output_style())
                        .centered(),
                    area,
                    &mut self.output_state,
                );
            }
            Effect::Reveal => {
                let cells = self.reveal.cells(now);
                frame.render_widget(
                    RevealText::new(&cells)
                        .modifier(Modifier::BOLD)
                        .centered(),
                    area,
                );
            }
        }
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = match (self.conductor.state(), self.conductor.result()) {
            (ConductorState::Processing(mode), _) => {
                Line::styled(mode.progress_label(), theme::progress_style())
            }
            (ConductorState::Showing, Some(result)) => {
                let noun = if result.token_count == 1 { "token" } else { "tokens" };
                let mut spans = vec![Span::styled(
                    format!("{} · {} {}", result.mode, result.token_count, noun),
                    theme::progress_style(),
                )];
                let scrollable = self.config.effect == Effect::Scramble
                    && self.output_state.overflows(self.output_area.height);
                if scrollable {
                    spans.push(Span::styled("  ·  PgUp/PgDn scroll", theme::chrome_style()));
                }
                if !self.reveal.is_revealing() && !self.scramble.is_animating() {
                    spans.push(Span::styled(
                        "  ·  Enter or click to start over",
                        theme::chrome_style(),
                    ));
                }
                Line::from(spans)
            }
            _ => Line::styled(
                "Enter convert · Ctrl-U clear · Tab info · Esc quit",
                theme::chrome_style(),
            ),
        };

        frame.render_widget(Paragraph::new(line.centered()), area);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn conductor(&self) -> &Conductor<T> {
        &self.conductor
    }

    pub fn config(&self) -> &MasqConfig {
        &self.config
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn show_info(&self) -> bool {
        self.show_info
    }

    /// Whether a submission is waiting for [`App::update`]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Output region from the last draw (empty while the input has focus)
    pub fn output_area(&self) -> Rect {
        self.output_area
    }

    /// Result text as currently shown by the active effect
    pub fn displayed_output(&self) -> String {
        match self.config.effect {
            Effect::Scramble => self.scramble.displayed().to_string(),
            Effect::Reveal => self.reveal.text(),
        }
    }

    /// Terminal size seen by the last draw or resize
    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}

fn center_horizontally(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Centered popup describing the two modes
fn draw_info(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled("How it works", theme::title_style()),
        Line::raw(""),
        Line::raw("Token Masq converts between text and cl100k_base token ids,"),
        Line::raw("the vocabulary used by GPT-4 class models."),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Encode  ", theme::progress_style()),
            Span::raw("type any text to see its token ids."),
        ]),
        Line::from(vec![
            Span::styled("Decode  ", theme::progress_style()),
            Span::raw("type space-separated ids to see the text."),
        ]),
        Line::raw(""),
        Line::raw("Input where more than 80% of the words are whole numbers"),
        Line::raw("is decoded; anything else is encoded."),
        Line::raw(""),
        Line::styled("Tab / Esc to close", theme::chrome_style()),
    ];

    let width = 64.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().border_style(theme::chrome_style()))
            .style(theme::input_style().bg(theme::BACKGROUND))
            .wrap(Wrap { trim: false }),
        popup,
    );
}
