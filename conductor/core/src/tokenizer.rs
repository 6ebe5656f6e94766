//! Tokenizer Adapter
//!
//! Trait seam between the Conductor and the byte-pair encoder. The BPE
//! algorithm itself is not implemented here; [`Cl100kAdapter`] wraps the
//! `cl100k_base` vocabulary shipped with `tiktoken-rs`.
//!
//! Implementations must report unknown token ids as an error instead of
//! panicking, so the Conductor can surface them to the user.

use thiserror::Error;
use tiktoken_rs::CoreBPE;

/// A token identifier in a fixed vocabulary
pub type TokenId = u32;

/// Name of the vocabulary used by [`Cl100kAdapter`]
pub const CL100K_BASE: &str = "cl100k_base";

/// Number of mergeable (ordinary) ranks in `cl100k_base`; valid ids are `0..100_256`
pub const CL100K_ORDINARY_TOKENS: TokenId = 100_256;

/// Special tokens of `cl100k_base` and their ids
pub const CL100K_SPECIAL_TOKENS: &[(&str, TokenId)] = &[
    ("<|endoftext|>", 100_257),
    ("<|fim_prefix|>", 100_258),
    ("<|fim_middle|>", 100_259),
    ("<|fim_suffix|>", 100_260),
    ("<|endofprompt|>", 100_276),
];

/// Errors reported by a tokenizer adapter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    /// The vocabulary could not be loaded
    #[error("Failed to load {encoding} vocabulary: {reason}")]
    Load {
        /// Vocabulary name
        encoding: String,
        /// Underlying failure
        reason: String,
    },

    /// A token id is not part of the vocabulary
    #[error("Unknown token id: {0}")]
    UnknownToken(TokenId),

    /// The decoded bytes do not form valid UTF-8 text
    #[error("Tokens do not decode to valid UTF-8 text ({reason})")]
    InvalidUtf8 {
        /// Underlying failure
        reason: String,
    },
}

/// Tokenizer adapter trait
///
/// Implement this to plug a different encoder into the Conductor.
pub trait TokenizerAdapter {
    /// Vocabulary name (e.g., "cl100k_base")
    fn name(&self) -> &str;

    /// Encode text into token ids
    fn encode(&self, text: &str) -> Vec<TokenId>;

    /// Decode token ids back into text
    ///
    /// # Errors
    ///
    /// Returns [`TokenizerError::UnknownToken`] for ids outside the vocabulary
    /// and [`TokenizerError::InvalidUtf8`] when the bytes are not valid text.
    fn decode(&self, tokens: &[TokenId]) -> Result<String, TokenizerError>;

    /// Number of tokens `text` encodes to
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// `cl100k_base` adapter backed by `tiktoken-rs`
pub struct Cl100kAdapter {
    bpe: CoreBPE,
}

impl Cl100kAdapter {
    /// Load the `cl100k_base` vocabulary
    ///
    /// # Errors
    ///
    /// Returns [`TokenizerError::Load`] if the embedded vocabulary fails to load.
    pub fn new() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::Load {
            encoding: CL100K_BASE.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(encoding = CL100K_BASE, "Loaded tokenizer vocabulary");
        Ok(Self { bpe })
    }

    /// Whether `id` exists in the vocabulary
    #[must_use]
    pub fn contains(id: TokenId) -> bool {
        id < CL100K_ORDINARY_TOKENS || CL100K_SPECIAL_TOKENS.iter().any(|(_, s)| *s == id)
    }
}

impl std::fmt::Debug for Cl100kAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cl100kAdapter")
            .field("encoding", &CL100K_BASE)
            .finish()
    }
}

impl TokenizerAdapter for Cl100kAdapter {
    fn name(&self) -> &str {
        CL100K_BASE
    }

    fn encode(&self, text: &str) -> Vec<TokenId> {
        self.bpe.encode_with_special_tokens(text)
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<String, TokenizerError> {
        // The library indexes its decoder directly, so unknown ids are rejected first
        if let Some(&unknown) = tokens.iter().find(|id| !Self::contains(**id)) {
            return Err(TokenizerError::UnknownToken(unknown));
        }

        self.bpe
            .decode(tokens.to_vec())
            .map_err(|e| TokenizerError::InvalidUtf8 {
                reason: e.to_string(),
            })
    }
}
