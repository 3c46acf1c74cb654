//! Cost data model.
//!
//! [`CostRecord`] is derived data: computed at most once per run, after the
//! underlying call has fully ended, and persisted keyed by
//! [`crate::ids::RunKey`] with overwrite semantics.

use serde::{Deserialize, Serialize};

/// Speech-synthesis backend family for a run.
///
/// Only [`SynthesizerKind::Polly`] bills per character; the streaming
/// backends are billed upstream and contribute zero here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesizerKind {
    /// Amazon Polly — billed per synthesized character.
    Polly,
    /// ElevenLabs streaming synthesis.
    Elevenlabs,
    /// Self-hosted XTTS.
    Xtts,
}

impl SynthesizerKind {
    /// Whether this backend is billed per synthesized character.
    #[must_use]
    pub fn is_character_billed(self) -> bool {
        matches!(self, Self::Polly)
    }
}

/// Cost breakdown for one completed run.
///
/// All monetary values are USD. `telephony_cost` passes the provider-reported
/// price through verbatim; it is `None` while the provider has not rated the
/// call yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Provider-reported call price, verbatim.
    pub telephony_cost: Option<f64>,
    /// Speech-to-text cost, billed by call duration.
    pub transcription_cost: f64,
    /// Language-model cost (input + output token pricing).
    pub llm_cost: f64,
    /// Speech-synthesis cost (zero unless character-billed).
    pub tts_cost: f64,
    /// Call duration in seconds.
    pub duration_secs: u32,
    /// Formatted destination number.
    pub to_number: String,
    /// Media URL of the call recording that was settled.
    pub recording_url: String,
}

impl CostRecord {
    /// Sum of the component costs that are known.
    ///
    /// A pending telephony price contributes zero rather than poisoning the
    /// total to unknown.
    #[must_use]
    pub fn known_total(&self) -> f64 {
        self.telephony_cost.unwrap_or(0.0) + self.transcription_cost + self.llm_cost + self.tts_cost
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
