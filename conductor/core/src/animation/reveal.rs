//! Reveal Animator
//!
//! Left-to-right reveal: every character fades in and slides up into place,
//! each one delayed in proportion to its index.

use std::time::Duration;

use super::EasingFunction;

/// Reveal timing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealConfig {
    /// Delay added per character index
    pub char_delay: Duration,
    /// Fade/slide duration of a single character
    pub char_duration: Duration,
    /// How long the reveal counts as "in progress"
    pub hold: Duration,
    /// Starting vertical offset (in rows) of each character
    pub rise: f32,
    /// Curve applied to each character's progress
    pub easing: EasingFunction,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(15),
            char_duration: Duration::from_millis(100),
            hold: Duration::from_millis(1000),
            rise: 1.0,
            easing: EasingFunction::EaseOut,
        }
    }
}

/// Render state of one character
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealCell {
    /// The character
    pub ch: char,
    /// 0.0 = invisible, 1.0 = fully shown
    pub opacity: f32,
    /// Remaining vertical offset in rows (0.0 = in place)
    pub offset: f32,
}

impl RevealCell {
    /// Whether the character has reached its final state
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.opacity >= 1.0 && self.offset <= 0.0
    }
}

/// Staggered per-character reveal
#[derive(Clone, Debug, Default)]
pub struct RevealAnimator {
    config: RevealConfig,
    text: Vec<char>,
    /// Clock reading when the current reveal began
    started_at: Option<Duration>,
    revealing: bool,
}

impl RevealAnimator {
    /// Create an idle animator
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            text: Vec::new(),
            started_at: None,
            revealing: false,
        }
    }

    /// Text being revealed
    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Begin revealing `text` at clock reading `now`
    ///
    /// An empty string clears the animator without starting a reveal.
    pub fn start(&mut self, text: &str, now: Duration) {
        self.text = text.chars().collect();
        if self.text.is_empty() {
            self.started_at = None;
            self.revealing = false;
            return;
        }
        self.started_at = Some(now);
        self.revealing = true;
    }

    /// Drop the text
    pub fn clear(&mut self) {
        self.start("", Duration::ZERO);
    }

    /// Whether a reveal is in progress
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    /// Clear the in-progress flag once `hold` has passed
    ///
    /// Returns whether the reveal is still in progress.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.revealing && self.elapsed(now) >= self.config.hold {
            self.revealing = false;
        }
        self.revealing
    }

    /// Time after the start at which the last character is in place
    pub fn finish_time(&self) -> Duration {
        let last = self.text.len().saturating_sub(1) as u32;
        self.config.char_delay * last + self.config.char_duration
    }

    /// Whether any character is still moving at `now`
    pub fn is_animating(&self, now: Duration) -> bool {
        self.started_at.is_some() && self.elapsed(now) < self.finish_time()
    }

    /// Per-character render state at `now`
    pub fn cells(&self, now: Duration) -> Vec<RevealCell> {
        let elapsed = self.elapsed(now);
        self.text
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                let progress = self.char_progress(i, elapsed);
                RevealCell {
                    ch,
                    opacity: progress,
                    offset: self.config.rise * (1.0 - progress),
                }
            })
            .collect()
    }

    fn elapsed(&self, now: Duration) -> Duration {
        match self.started_at {
            Some(started_at) => now.saturating_sub(started_at),
            // Never started: everything shows as settled
            None => Duration::MAX,
        }
    }

    fn char_progress(&self, index: usize, elapsed: Duration) -> f32 {
        let delay = self.config.char_delay * index as u32;
        let Some(local) = elapsed.checked_sub(delay) else {
            return 0.0;
        };
        if self.config.char_duration.is_zero() {
            return 1.0;
        }
        let t = local.as_secs_f32() / self.config.char_duration.as_secs_f32();
        self.config.easing.apply(t)
    }
}
