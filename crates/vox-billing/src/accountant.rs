//! The cost accountant — folds usage signals into one persisted record.
//!
//! All collaborators are injected (estimator, run store); the accountant
//! never reaches into orchestrator state. The synthesizer kind arrives as
//! an explicit input rather than being read out of the first task's tool
//! configuration.

use tracing::{debug, info};

use std::sync::Arc;

use vox_core::call::CallMetadata;
use vox_core::cost::{CostRecord, SynthesizerKind};
use vox_core::ids::RunKey;
use vox_core::messages::ChatMessage;
use vox_store::run_store::RunStore;

use crate::errors::Result;
use crate::estimator::TokenCostEstimator;

/// Usage signals accumulated over one run.
#[derive(Clone, Debug)]
pub struct RunUsage {
    /// Conversation transcript, in turn order.
    pub transcript: Vec<ChatMessage>,
    /// Per-stage label outputs, billed as model output.
    pub stage_labels: Vec<String>,
    /// Characters sent through the transcriber. Recorded for observability;
    /// transcription bills by call duration.
    pub transcriber_chars: usize,
    /// Characters sent through the synthesizer.
    pub synthesizer_chars: usize,
    /// Which synthesis backend the run used.
    pub synthesizer: SynthesizerKind,
}

/// Computes a run's cost breakdown and persists it.
pub struct CostAccountant {
    estimator: TokenCostEstimator,
    store: Arc<dyn RunStore>,
}

impl CostAccountant {
    /// Create an accountant over an estimator and a run-metadata store.
    pub fn new(estimator: TokenCostEstimator, store: Arc<dyn RunStore>) -> Self {
        Self { estimator, store }
    }

    /// Compute the cost record for a completed run and persist it.
    ///
    /// Must be called at most once per run, after the call has fully ended
    /// (duration known). The store upserts, so an accidental second call
    /// overwrites rather than double-charges.
    pub fn settle(
        &self,
        key: &RunKey,
        call: &CallMetadata,
        recording_url: &str,
        usage: &RunUsage,
    ) -> Result<CostRecord> {
        let pricing = self.estimator.pricing();

        let llm_cost = self.estimator.estimate_input_cost(&usage.transcript)
            + self.estimator.estimate_output_cost(&usage.stage_labels);

        let record = CostRecord {
            telephony_cost: call.price,
            transcription_cost: pricing.transcription_cost(call.duration_secs),
            llm_cost,
            tts_cost: pricing.synthesis_cost(usage.synthesizer, usage.synthesizer_chars),
            duration_secs: call.duration_secs,
            to_number: call.to_number.clone(),
            recording_url: recording_url.to_string(),
        };

        debug!(
            run_id = %key.run_id,
            call_id = %call.call_id,
            transcriber_chars = usage.transcriber_chars,
            synthesizer_chars = usage.synthesizer_chars,
            "computed cost breakdown"
        );

        self.store.store_run(key, &record)?;
        info!(run_id = %key.run_id, total = record.known_total(), "cost record persisted");
        Ok(record)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
