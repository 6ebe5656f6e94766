//! Conductor - Conversion Orchestration
//!
//! The Conductor owns the raw input, the last conversion result and the
//! current error, and dispatches each submission to the tokenizer according
//! to the Mode Classifier.
//!
//! It is UI-agnostic: the terminal surface and the one-shot CLI both drive
//! the same state machine.
//!
//! # Submission lifecycle
//!
//! ```text
//! Editing ──begin_submission──▶ Processing(mode) ──complete_submission──▶ Showing
//!    ▲                                                          └────────▶ Failed
//!    └───────────────────────────── reset ─────────────────────────────────┘
//! ```
//!
//! Submission is split in two so a surface can draw its progress indicator
//! between classification and conversion.

use serde::Serialize;
use thiserror::Error;

use crate::mode::{classify, parse_tokens, Mode, ParseError};
use crate::tokenizer::{TokenizerAdapter, TokenizerError};

/// Errors produced by a single conversion
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// A word could not be parsed as a token id
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The tokenizer rejected the input
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
}

/// A successful conversion
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// Direction that was applied
    pub mode: Mode,
    /// Decoded text, or space-joined token ids
    pub output: String,
    /// Number of tokens involved (input tokens for decode, output tokens for encode)
    pub token_count: usize,
}

/// Outcome of a submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Nothing to convert (empty input, or no submission pending)
    Skipped,
    /// Conversion succeeded
    Converted(Conversion),
    /// Conversion failed
    Failed(ConversionError),
}

/// Conductor operational states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConductorState {
    /// Waiting for input
    Editing,
    /// A submission is being converted
    Processing(Mode),
    /// A result is available
    Showing,
    /// The last submission failed
    Failed,
}

impl ConductorState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Editing => "Ready",
            Self::Processing(mode) => mode.progress_label(),
            Self::Showing => "Done",
            Self::Failed => "Error",
        }
    }
}

/// Convert `input` with `tokenizer` according to its classified mode
///
/// Returns `Ok(None)` for empty or whitespace-only input.
///
/// # Errors
///
/// Returns [`ConversionError::Parse`] when decode-mode input has a word that
/// is not a token id, and [`ConversionError::Tokenizer`] when the tokenizer
/// rejects the ids.
pub fn convert<T: TokenizerAdapter + ?Sized>(
    tokenizer: &T,
    input: &str,
) -> Result<Option<Conversion>, ConversionError> {
    match classify(input) {
        Some(classification) => convert_as(tokenizer, input, classification.mode).map(Some),
        None => Ok(None),
    }
}

/// Convert `input` in an explicit mode
///
/// # Errors
///
/// Same as [`convert`].
pub fn convert_as<T: TokenizerAdapter + ?Sized>(
    tokenizer: &T,
    input: &str,
    mode: Mode,
) -> Result<Conversion, ConversionError> {
    match mode {
        Mode::Decode => {
            let tokens = parse_tokens(input)?;
            let output = tokenizer.decode(&tokens)?;
            Ok(Conversion {
                mode,
                output,
                token_count: tokens.len(),
            })
        }
        Mode::Encode => {
            let tokens = tokenizer.encode(input);
            let output = tokens
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            Ok(Conversion {
                mode,
                output,
                token_count: tokens.len(),
            })
        }
    }
}

/// The Conductor - conversion state machine
pub struct Conductor<T: TokenizerAdapter> {
    /// Tokenizer adapter
    tokenizer: T,
    /// Raw user input
    input: String,
    /// Last successful conversion
    result: Option<Conversion>,
    /// Last error message
    error: Option<String>,
    /// Current state
    state: ConductorState,
}

impl<T: TokenizerAdapter> Conductor<T> {
    /// Create a new Conductor around a tokenizer
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            input: String::new(),
            result: None,
            error: None,
            state: ConductorState::Editing,
        }
    }

    /// The tokenizer in use
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Current raw input
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Last successful conversion
    pub fn result(&self) -> Option<&Conversion> {
        self.result.as_ref()
    }

    /// Active error message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current state
    pub fn state(&self) -> ConductorState {
        self.state
    }

    /// Whether a submission is in flight
    pub fn is_processing(&self) -> bool {
        matches!(self.state, ConductorState::Processing(_))
    }

    /// Replace the input
    pub fn set_input(&mut self, input: impl Into<String>) {
        if !self.is_processing() {
            self.input = input.into();
        }
    }

    /// Append a character to the input
    pub fn push_char(&mut self, c: char) {
        if !self.is_processing() {
            self.input.push(c);
        }
    }

    /// Remove the last character of the input
    pub fn pop_char(&mut self) {
        if !self.is_processing() {
            self.input.pop();
        }
    }

    /// Clear the input only
    pub fn clear_input(&mut self) {
        if !self.is_processing() {
            self.input.clear();
        }
    }

    /// Start a submission
    ///
    /// Clears the previous error, classifies the input and enters
    /// `Processing`. Returns `None` (and stays put) for blank input or when a
    /// submission is already pending.
    pub fn begin_submission(&mut self) -> Option<Mode> {
        if self.is_processing() {
            return None;
        }

        self.error = None;
        let classification = classify(&self.input)?;

        tracing::debug!(
            mode = %classification.mode,
            words = classification.words,
            numeric_words = classification.numeric_words,
            "Classified input"
        );

        self.state = ConductorState::Processing(classification.mode);
        Some(classification.mode)
    }

    /// Finish the pending submission
    ///
    /// Always leaves the `Processing` state.
    pub fn complete_submission(&mut self) -> Submission {
        let mode = match self.state {
            ConductorState::Processing(mode) => mode,
            _ => return Submission::Skipped,
        };

        match convert_as(&self.tokenizer, &self.input, mode) {
            Ok(conversion) => {
                tracing::debug!(
                    mode = %conversion.mode,
                    tokens = conversion.token_count,
                    "Conversion complete"
                );
                self.result = Some(conversion.clone());
                self.state = ConductorState::Showing;
                Submission::Converted(conversion)
            }
            Err(e) => {
                tracing::warn!(mode = %mode, error = %e, "Conversion failed");
                self.result = None;
                self.error = Some(e.to_string());
                self.state = ConductorState::Failed;
                Submission::Failed(e)
            }
        }
    }

    /// Classify and convert in one go
    pub fn submit(&mut self) -> Submission {
        match self.begin_submission() {
            Some(_) => self.complete_submission(),
            None => Submission::Skipped,
        }
    }

    /// Clear input, result and error for a new round-trip
    pub fn reset(&mut self) {
        self.input.clear();
        self.result = None;
        self.error = None;
        self.state = ConductorState::Editing;
    }
}
