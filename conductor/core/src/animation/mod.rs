//! Animation System - Surface-Agnostic Text Effects
//!
//! Purely decorative text transitions, independent of any rendering
//! surface. Animators never read the wall clock themselves: every update
//! takes a reading from an injected [`Clock`] (or an explicit elapsed time),
//! so effects are testable without real timers.
//!
//! - [`ScrambleAnimator`]: glitch transition from one string to another
//! - [`RevealAnimator`]: staggered per-character fade/slide-in

mod clock;
mod reveal;
mod scramble;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reveal::{RevealAnimator, RevealCell, RevealConfig};
pub use scramble::{CharCell, ScrambleAnimator, ScrambleConfig, ScrambleFrame, DEFAULT_GLYPHS};

use serde::{Deserialize, Serialize};

/// Easing functions for animation curves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing (constant speed)
    #[default]
    Linear,

    /// Slow start, fast end
    EaseIn,

    /// Fast start, slow end
    EaseOut,

    /// Slow start and end
    EaseInOut,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}
