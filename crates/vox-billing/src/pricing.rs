//! Pricing rules — unit rates and per-resource cost computation.
//!
//! Each resource type is billed by a different signal: telephony by the
//! provider's own price, transcription by call duration, synthesis by
//! character count (Polly only), the language model by token counts.

use vox_core::cost::SynthesizerKind;
use vox_settings::BillingSettings;

/// Seconds per billing minute.
const SECS_PER_MINUTE: f64 = 60.0;

/// Characters per synthesis billing unit.
const CHARS_PER_MILLION: f64 = 1_000_000.0;

/// Unit rates for one deployment, all USD.
#[derive(Clone, Debug, PartialEq)]
pub struct PricingTable {
    /// Language-model input price per token.
    pub llm_input_per_token: f64,
    /// Language-model output price per token.
    pub llm_output_per_token: f64,
    /// Speech-to-text price per minute of call audio.
    pub transcription_per_minute: f64,
    /// Character-billed synthesis price per million characters.
    pub character_synthesis_per_million_chars: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::from_settings(&BillingSettings::default())
    }
}

impl PricingTable {
    /// Build a table from configured billing rates.
    #[must_use]
    pub fn from_settings(billing: &BillingSettings) -> Self {
        Self {
            llm_input_per_token: billing.llm_input_per_token,
            llm_output_per_token: billing.llm_output_per_token,
            transcription_per_minute: billing.transcription_per_minute,
            character_synthesis_per_million_chars: billing.character_synthesis_per_million_chars,
        }
    }

    /// Cost of `tokens` billed at the input rate.
    #[must_use]
    pub fn input_token_cost(&self, tokens: usize) -> f64 {
        tokens as f64 * self.llm_input_per_token
    }

    /// Cost of `tokens` billed at the output rate.
    #[must_use]
    pub fn output_token_cost(&self, tokens: usize) -> f64 {
        tokens as f64 * self.llm_output_per_token
    }

    /// Speech-to-text cost for a call of `duration_secs`.
    #[must_use]
    pub fn transcription_cost(&self, duration_secs: u32) -> f64 {
        f64::from(duration_secs) * (self.transcription_per_minute / SECS_PER_MINUTE)
    }

    /// Speech-synthesis cost for `chars` synthesized characters.
    ///
    /// Zero for every backend that is not character-billed.
    #[must_use]
    pub fn synthesis_cost(&self, kind: SynthesizerKind, chars: usize) -> f64 {
        if kind.is_character_billed() {
            chars as f64 * self.character_synthesis_per_million_chars / CHARS_PER_MILLION
        } else {
            0.0
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
