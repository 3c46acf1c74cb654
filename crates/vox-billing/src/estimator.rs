//! Token-based cost estimation for language-model usage.
//!
//! Output billing is simple: every stage label output is tokenized and
//! billed at the output rate.
//!
//! Input billing follows the turn-prefix rule: every assistant turn
//! consumes, as model input, the entire conversation prefix preceding it.
//! Rather than replaying the full prefix history per turn, the estimator
//! keeps one running buffer — system and user content appends to it, and
//! each assistant turn first bills the buffer accumulated so far, then
//! appends its own content for the next round.
//!
//! A transcript with no assistant turn at all would bill nothing under the
//! raw rule even though the prefix was assembled and sent; such transcripts
//! bill the full accumulated prefix once at the end instead.

use std::sync::Arc;

use vox_core::messages::{ChatMessage, ChatRole};

use crate::pricing::PricingTable;
use crate::tokenizer::TokenCounter;

/// Converts transcripts and stage outputs to language-model cost.
pub struct TokenCostEstimator {
    counter: Arc<dyn TokenCounter>,
    pricing: PricingTable,
}

impl TokenCostEstimator {
    /// Create an estimator over a token counter and a pricing table.
    pub fn new(counter: Arc<dyn TokenCounter>, pricing: PricingTable) -> Self {
        Self { counter, pricing }
    }

    /// The pricing table this estimator bills against.
    #[must_use]
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Billable output tokens across all stage outputs.
    pub fn count_output_tokens<S: AsRef<str>>(&self, outputs: &[S]) -> usize {
        outputs
            .iter()
            .map(|op| self.counter.count(op.as_ref()))
            .sum()
    }

    /// Total cost of all stage outputs at the output-token rate.
    pub fn estimate_output_cost<S: AsRef<str>>(&self, outputs: &[S]) -> f64 {
        self.pricing
            .output_token_cost(self.count_output_tokens(outputs))
    }

    /// Billable input tokens under the turn-prefix rule.
    pub fn count_input_tokens(&self, messages: &[ChatMessage]) -> usize {
        let mut buffer = String::new();
        let mut billed = 0usize;
        let mut assistant_turns = 0usize;

        for message in messages {
            match message.role {
                ChatRole::System | ChatRole::User => buffer.push_str(&message.content),
                ChatRole::Assistant => {
                    billed += self.counter.count(&buffer);
                    assistant_turns += 1;
                    buffer.push_str(&message.content);
                }
            }
        }

        // A transcript that never reached an assistant turn still sent its
        // prefix to the model once; bill it once.
        if assistant_turns == 0 && !buffer.is_empty() {
            billed += self.counter.count(&buffer);
        }

        billed
    }

    /// Total cost of the conversation transcript at the input-token rate.
    pub fn estimate_input_cost(&self, messages: &[ChatMessage]) -> f64 {
        self.pricing
            .input_token_cost(self.count_input_tokens(messages))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
