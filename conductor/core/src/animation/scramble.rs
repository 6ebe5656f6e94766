//! Scramble Animator
//!
//! Glitch transition between two strings. Each character index gets its
//! own randomized time window; before the window the old character shows,
//! inside it random glyphs flicker (most chaotic mid-window, increasingly
//! biased to the target), after it the target character settles.
//!
//! Start offsets are biased by position so the effect sweeps left to right
//! as a diagonal wave instead of firing all at once.
//!
//! # Sessions
//!
//! The animator owns a single transition at a time. [`ScrambleAnimator::start`]
//! cancels the running transition and replaces the whole cell table before
//! anything else happens, so no step of the old schedule can write after a
//! new transition has begun.

use std::f64::consts::PI;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Default glyph palette for scrambled characters
pub const DEFAULT_GLYPHS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!<>-_\\/[]{}—=+*^?#░▒▓█▄▀■□";

/// Character index at which the random start offset reaches its full range
const STAGGER_SPAN: f64 = 30.0;

/// Fixed per-index delay in milliseconds
const POSITION_STEP_MS: f64 = 20.0;

/// Minimum window length, in multiples of the scramble speed
const MIN_WINDOW_STEPS: f64 = 2.0;

/// Peak probability of a random glyph mid-window
const CHAOS_PEAK: f64 = 0.7;

/// How strongly progress pulls towards the target character
const TARGET_BIAS: f64 = 0.8;

/// Scramble timing and palette
#[derive(Clone, Debug, PartialEq)]
pub struct ScrambleConfig {
    /// Base time unit for offsets and window lengths
    pub speed: Duration,
    /// Spread of random offsets and window lengths, in units of `speed`
    pub factor: f64,
    /// Substitution glyphs
    pub glyphs: Vec<char>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(60),
            factor: 24.0,
            glyphs: DEFAULT_GLYPHS.chars().collect(),
        }
    }
}

/// Schedule of one character index within a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharCell {
    /// Character shown before the window (`None` past the old string's end)
    pub from: Option<char>,
    /// Character shown after the window (`None` past the new string's end)
    pub to: Option<char>,
    /// Window start, relative to the transition start
    pub start: Duration,
    /// Window end, relative to the transition start
    pub end: Duration,
}

/// One rendered frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrambleFrame {
    /// Text to display
    pub text: String,
    /// Whether every character has settled
    pub complete: bool,
}

#[derive(Debug)]
struct Transition {
    cells: Vec<CharCell>,
    started_at: Duration,
}

/// Scramble animation session
#[derive(Debug)]
pub struct ScrambleAnimator<R: Rng = StdRng> {
    config: ScrambleConfig,
    rng: R,
    /// Running transition, if any
    transition: Option<Transition>,
    /// Last rendered text
    displayed: String,
    /// Text the running (or last) transition settles on
    target: String,
}

impl ScrambleAnimator<StdRng> {
    /// Create an animator with an entropy-seeded generator
    pub fn new(config: ScrambleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> ScrambleAnimator<R> {
    /// Create an animator with a specific generator (seeded in tests)
    pub fn with_rng(config: ScrambleConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            transition: None,
            displayed: String::new(),
            target: String::new(),
        }
    }

    /// Last rendered text
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Text the transition settles on
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether a transition is still running (more ticks needed)
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Cell table of the running transition
    pub fn cells(&self) -> &[CharCell] {
        self.transition
            .as_ref()
            .map(|t| t.cells.as_slice())
            .unwrap_or(&[])
    }

    /// Time (relative to the transition start) after which every cell has settled
    pub fn settle_time(&self) -> Option<Duration> {
        let transition = self.transition.as_ref()?;
        Some(
            transition
                .cells
                .iter()
                .map(|c| c.end)
                .max()
                .unwrap_or(Duration::ZERO),
        )
    }

    /// Begin a transition from `old` to `new` at clock reading `now`
    ///
    /// Any running transition is cancelled first.
    pub fn start(&mut self, old: &str, new: &str, now: Duration) {
        self.cancel();

        let old: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();
        let len = old.len().max(new_chars.len());

        let cells: Vec<CharCell> = (0..len)
            .map(|i| self.plan_cell(i, old.get(i).copied(), new_chars.get(i).copied()))
            .collect();

        tracing::trace!(cells = cells.len(), "Scramble transition started");

        self.displayed = old.into_iter().collect();
        self.target = new.to_string();
        self.transition = Some(Transition {
            cells,
            started_at: now,
        });
    }

    /// Begin a transition from whatever is displayed now to `new`
    pub fn retarget(&mut self, new: &str, now: Duration) {
        let old = std::mem::take(&mut self.displayed);
        self.start(&old, new, now);
    }

    /// Stop the running transition where it is
    ///
    /// Returns whether a transition was running.
    pub fn cancel(&mut self) -> bool {
        self.transition.take().is_some()
    }

    /// Stop and blank the display
    pub fn clear(&mut self) {
        self.cancel();
        self.displayed.clear();
        self.target.clear();
    }

    /// Advance against a clock reading
    ///
    /// Returns `false` when no transition is running (nothing to redraw).
    pub fn tick(&mut self, now: Duration) -> bool {
        let started_at = match &self.transition {
            Some(t) => t.started_at,
            None => return false,
        };
        self.step(now.saturating_sub(started_at));
        true
    }

    /// Render the running transition at `elapsed` since its start
    ///
    /// Once every cell is past its end the frame is pinned to the target and
    /// the transition ends.
    pub fn step(&mut self, elapsed: Duration) -> ScrambleFrame {
        let Some(transition) = self.transition.as_ref() else {
            return ScrambleFrame {
                text: self.displayed.clone(),
                complete: true,
            };
        };

        let mut text = String::with_capacity(transition.cells.len());
        let mut complete = true;

        for cell in &transition.cells {
            let rendered = if elapsed > cell.end {
                cell.to
            } else if elapsed > cell.start {
                complete = false;
                scramble_char(cell, elapsed, &mut self.rng, &self.config.glyphs)
            } else {
                complete = false;
                cell.from
            };
            text.extend(rendered);
        }

        if complete {
            self.transition = None;
            self.displayed = self.target.clone();
            tracing::trace!("Scramble transition settled");
        } else {
            self.displayed = text;
        }

        ScrambleFrame {
            text: self.displayed.clone(),
            complete,
        }
    }

    fn plan_cell(&mut self, index: usize, from: Option<char>, to: Option<char>) -> CharCell {
        let speed_ms = self.config.speed.as_secs_f64() * 1000.0;
        let stagger = (index as f64 / STAGGER_SPAN).min(1.0);

        let random_start = (self.rng.gen::<f64>() * self.config.factor * stagger).floor() * speed_ms;
        let start_ms = random_start + index as f64 * POSITION_STEP_MS;
        let window_ms = speed_ms * (MIN_WINDOW_STEPS + self.rng.gen::<f64>() * self.config.factor);

        CharCell {
            from,
            to,
            start: millis(start_ms),
            end: millis(start_ms + window_ms),
        }
    }
}

/// Character shown for a cell inside its window
fn scramble_char<R: Rng>(
    cell: &CharCell,
    elapsed: Duration,
    rng: &mut R,
    glyphs: &[char],
) -> Option<char> {
    if cell.from == Some(' ') && cell.to == Some(' ') {
        return Some(' ');
    }

    let window = (cell.end - cell.start).as_secs_f64();
    let progress = if window > 0.0 {
        ((elapsed - cell.start).as_secs_f64() / window).min(1.0)
    } else {
        1.0
    };
    let chaos = (progress * PI).sin();

    let glyph = |rng: &mut R| glyphs.choose(rng).copied().or(cell.to);

    if rng.gen::<f64>() < chaos * CHAOS_PEAK {
        glyph(&mut *rng)
    } else if rng.gen::<f64>() < progress * TARGET_BIAS {
        cell.to
    } else {
        glyph(&mut *rng)
    }
}

/// Saturates at `Duration::MAX`; NaN maps to zero
fn millis(ms: f64) -> Duration {
    if ms.is_nan() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}
