//! Token counting behind a trait seam.
//!
//! The cost engine only needs "count the tokens of a string" — stable and
//! deterministic for a given text. Production uses the cl100k byte-pair
//! encoding; tests substitute cheap fakes through [`TokenCounter`].

use tiktoken_rs::cl100k_base;

use crate::errors::{BillingError, Result};

/// Deterministic token counting for billing.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`. Stable for a given input.
    fn count(&self, text: &str) -> usize;
}

/// cl100k byte-pair encoder.
pub struct Cl100kTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

impl Cl100kTokenizer {
    /// Build the encoder. The rank tables are compiled in, so this only
    /// fails if the embedded data is corrupt.
    pub fn new() -> Result<Self> {
        let bpe = cl100k_base().map_err(|e| BillingError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for Cl100kTokenizer {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
