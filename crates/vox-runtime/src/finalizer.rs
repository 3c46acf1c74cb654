//! Post-call settlement.
//!
//! Once the call behind a run ends, the finalizer drives the accounting
//! flow exactly once: fetch call metadata, locate the recording, compute
//! and persist the cost record, then archive the recording bytes.
//!
//! Cost accounting never proceeds with incomplete data — a missing call or
//! an empty recording list fails loudly before anything is persisted.
//! Archival failure is independent of cost accounting: the settlement
//! reports both outcomes distinctly instead of merging them into one error.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use vox_billing::accountant::{CostAccountant, RunUsage};
use vox_billing::errors::BillingError;
use vox_core::cost::CostRecord;
use vox_core::ids::{CallId, RunKey};
use vox_telephony::client::TelephonyClient;

use crate::archiver::RecordingArchiver;
use crate::emitter::EventEmitter;
use crate::errors::RuntimeError;
use crate::events::RunEvent;

/// Outcome of settling one run.
#[derive(Debug)]
pub struct RunSettlement {
    /// The persisted cost record.
    pub record: CostRecord,
    /// Object key of the archived recording, or the archival failure.
    /// Reported separately from cost accounting so a missing archive can
    /// be retried without touching the record.
    pub recording: Result<String, RuntimeError>,
}

/// Drives the one-shot settlement flow for completed runs.
pub struct RunFinalizer {
    telephony: Arc<dyn TelephonyClient>,
    accountant: CostAccountant,
    archiver: RecordingArchiver,
    emitter: Arc<EventEmitter>,
}

impl RunFinalizer {
    /// Create a finalizer from its injected collaborators.
    pub fn new(
        telephony: Arc<dyn TelephonyClient>,
        accountant: CostAccountant,
        archiver: RecordingArchiver,
    ) -> Self {
        Self {
            telephony,
            accountant,
            archiver,
            emitter: Arc::new(EventEmitter::new()),
        }
    }

    /// Share an existing emitter instead of the finalizer-local one.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<EventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Settle a completed run.
    ///
    /// Must be invoked once per run, after the call has fully ended. The
    /// run store upserts, so an accidental second settlement overwrites
    /// rather than double-charges.
    #[instrument(skip(self, usage), fields(run_id = %key.run_id, call_id = %call_id))]
    pub async fn finalize(
        &self,
        key: &RunKey,
        call_id: &CallId,
        usage: &RunUsage,
    ) -> Result<RunSettlement, RuntimeError> {
        let call = self
            .telephony
            .fetch_call(call_id)
            .await
            .map_err(|e| RuntimeError::MetadataUnavailable(format!("call {call_id}: {e}")))?;

        let recordings = self
            .telephony
            .list_recordings(call_id)
            .await
            .map_err(|e| RuntimeError::MetadataUnavailable(format!("recordings for {call_id}: {e}")))?;
        let Some(recording) = recordings.first() else {
            return Err(RuntimeError::MetadataUnavailable(format!(
                "no recordings found for call {call_id}"
            )));
        };

        let record = self
            .accountant
            .settle(key, &call, &recording.media_url, usage)
            .map_err(|e| match e {
                BillingError::Persistence(inner) => RuntimeError::Persistence(inner.to_string()),
                BillingError::Tokenizer(msg) => RuntimeError::Internal(msg),
            })?;
        let _ = self.emitter.emit(RunEvent::CostRecorded {
            run_id: key.run_id.to_string(),
            total: record.known_total(),
        });

        let recording_outcome = self.archiver.archive(key, &recording.media_url).await;
        if let Err(e) = &recording_outcome {
            warn!(error = %e, "recording archive failed; cost record already persisted");
        }

        info!(total = record.known_total(), "run settled");
        Ok(RunSettlement {
            record,
            recording: recording_outcome,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
