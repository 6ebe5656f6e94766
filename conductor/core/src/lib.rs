//! Masq Core - Headless Token Conversion for Token Masq
//!
//! This crate holds everything Token Masq does that is not terminal
//! plumbing: deciding whether input is text or token ids, converting it
//! through the `cl100k_base` tokenizer, and computing the decorative text
//! effects frame by frame. It can drive the TUI, the one-shot CLI, or run
//! headless in tests.
//!
//! # Architecture
//!
//! ```text
//! raw input ──▶ mode::classify ──▶ Conductor ──▶ TokenizerAdapter (tiktoken-rs)
//!                                     │
//!                                     ▼
//!                              Conversion.output
//!                                     │
//!                     ┌───────────────┴───────────────┐
//!                     ▼                               ▼
//!              ScrambleAnimator                 RevealAnimator
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: owns input, result and error; runs submissions
//! - [`Mode`]: encode or decode, derived per submission
//! - [`TokenizerAdapter`]: seam to the external encoder
//! - [`ScrambleAnimator`] / [`RevealAnimator`]: clock-driven text effects
//! - [`MasqConfig`]: resolved configuration
//!
//! # Quick Start
//!
//! ```no_run
//! use masq_core::{Cl100kAdapter, Conductor, Submission};
//!
//! let mut conductor = Conductor::new(Cl100kAdapter::new().unwrap());
//! conductor.set_input("15339 1917");
//! if let Submission::Converted(conversion) = conductor.submit() {
//!     assert_eq!(conversion.output, "hello world");
//! }
//! ```

pub mod animation;
pub mod conductor;
pub mod config;
pub mod mode;
pub mod tokenizer;

pub use animation::{
    Clock, ManualClock, RevealAnimator, RevealConfig, ScrambleAnimator, ScrambleConfig,
    SystemClock,
};
pub use conductor::{
    convert, convert_as, Conductor, ConductorState, Conversion, ConversionError, Submission,
};
pub use config::{load_config, load_config_from_path, ConfigError, ConfigSource, Effect, MasqConfig};
pub use mode::{classify, parse_tokens, Classification, Mode, ParseError, DECODE_THRESHOLD};
pub use tokenizer::{Cl100kAdapter, TokenId, TokenizerAdapter, TokenizerError, CL100K_BASE};
