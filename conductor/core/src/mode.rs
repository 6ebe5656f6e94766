//! Mode Classifier
//!
//! Decides whether raw input is a list of token ids (decode) or plain text
//! (encode). The rule is a heuristic: when more than 80% of the
//! whitespace-separated words are base-10 integers the whole input is
//! treated as tokens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tokenizer::TokenId;

/// Numeric-word ratio above which input is treated as tokens (strict)
pub const DECODE_THRESHOLD: f64 = 0.8;

/// Conversion direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Text to token ids
    Encode,
    /// Token ids to text
    Decode,
}

impl Mode {
    /// Status text shown while a conversion in this mode runs
    #[must_use]
    pub fn progress_label(self) -> &'static str {
        match self {
            Self::Encode => "Encoding...",
            Self::Decode => "Decoding...",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode => write!(f, "encode"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

/// Result of classifying one input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Detected mode
    pub mode: Mode,
    /// Non-empty whitespace-separated words
    pub words: usize,
    /// Words that parse as base-10 integers
    pub numeric_words: usize,
}

impl Classification {
    /// Share of numeric words (0.0 to 1.0)
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.numeric_words as f64 / self.words as f64
    }
}

/// Errors parsing input as a token sequence
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A word is not a valid non-negative token id
    #[error("Invalid token: {fragment}")]
    InvalidToken {
        /// The first offending word
        fragment: String,
    },
}

/// Classify raw input
///
/// Returns `None` for empty or whitespace-only input; callers treat that as
/// a no-op submission.
#[must_use]
pub fn classify(input: &str) -> Option<Classification> {
    let mut words = 0usize;
    let mut numeric_words = 0usize;

    for word in input.split_whitespace() {
        words += 1;
        if word.parse::<i64>().is_ok() {
            numeric_words += 1;
        }
    }

    if words == 0 {
        return None;
    }

    let ratio = numeric_words as f64 / words as f64;
    let mode = if ratio > DECODE_THRESHOLD {
        Mode::Decode
    } else {
        Mode::Encode
    };

    Some(Classification {
        mode,
        words,
        numeric_words,
    })
}

/// Parse whitespace-separated token ids
///
/// # Errors
///
/// Returns [`ParseError::InvalidToken`] naming the first word that is not a
/// non-negative integer in range.
pub fn parse_tokens(input: &str) -> Result<Vec<TokenId>, ParseError> {
    input
        .split_whitespace()
        .map(|word| {
            word.parse::<TokenId>()
                .map_err(|_| ParseError::InvalidToken {
                    fragment: word.to_string(),
                })
        })
        .collect()
}
