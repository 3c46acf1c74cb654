//! Run coordinator — process-level tracking of concurrent runs.
//!
//! Independent runs (distinct run identities) execute concurrently with no
//! shared mutable state beyond the external stores. The coordinator is the
//! one process-wide structure: it tracks which runs are live, enforces a
//! concurrency ceiling, and hands out per-run cancellation tokens.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, broadcast};
use tokio_util::sync::CancellationToken;

use metrics::gauge;
use tracing::{debug, info, instrument, warn};

use vox_core::ids::{AssistantId, RunId};

use crate::emitter::EventEmitter;
use crate::errors::RuntimeError;
use crate::events::RunEvent;

/// Tracks one live run.
struct ActiveRun {
    assistant_id: AssistantId,
    cancel: CancellationToken,
    /// RAII guard — released when the run is removed from `active_runs`.
    _permit: OwnedSemaphorePermit,
}

/// Concurrent-run coordinator.
pub struct RunCoordinator {
    broadcast: Arc<EventEmitter>,
    max_concurrent_runs: usize,
    /// Semaphore limiting total concurrent runs.
    run_semaphore: Arc<Semaphore>,
    /// Live runs keyed by run id.
    active_runs: Mutex<HashMap<String, ActiveRun>>,
}

impl RunCoordinator {
    /// Create a coordinator from configured runtime limits.
    pub fn from_settings(settings: &vox_settings::RuntimeSettings) -> Self {
        Self::new(settings.max_concurrent_runs)
    }

    /// Create a coordinator allowing up to `max_concurrent` runs.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            broadcast: Arc::new(EventEmitter::new()),
            max_concurrent_runs: max_concurrent,
            run_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            active_runs: Mutex::new(HashMap::new()),
        }
    }

    /// Get the broadcast emitter shared with orchestrators.
    pub fn broadcast(&self) -> &Arc<EventEmitter> {
        &self.broadcast
    }

    /// Subscribe to all run events.
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.broadcast.subscribe()
    }

    /// Start tracking a run. Returns its `CancellationToken`.
    ///
    /// Errors if:
    /// - The run is already tracked (`RunAlreadyActive`)
    /// - The process is at max concurrent runs (`AtCapacity`)
    #[instrument(skip(self), fields(run_id = %run_id))]
    pub fn start_run(
        &self,
        run_id: &RunId,
        assistant_id: &AssistantId,
    ) -> Result<CancellationToken, RuntimeError> {
        let mut runs = self.active_runs.lock();
        if runs.contains_key(run_id.as_str()) {
            return Err(RuntimeError::RunAlreadyActive(run_id.to_string()));
        }
        // Acquire a concurrency permit (non-blocking).
        let permit = Arc::clone(&self.run_semaphore)
            .try_acquire_owned()
            .map_err(|_| RuntimeError::AtCapacity {
                current: runs.len(),
                max: self.max_concurrent_runs,
            })?;
        let cancel = CancellationToken::new();
        let _ = runs.insert(
            run_id.to_string(),
            ActiveRun {
                assistant_id: assistant_id.clone(),
                cancel: cancel.clone(),
                _permit: permit,
            },
        );
        gauge!("vox_runs_active").set(runs.len() as f64);
        info!(assistant_id = %assistant_id, "run started");
        Ok(cancel)
    }

    /// Complete a run (removes it from active tracking, freeing a permit).
    #[instrument(skip(self), fields(run_id = %run_id))]
    pub fn complete_run(&self, run_id: &RunId) {
        debug!("run completed");
        let mut runs = self.active_runs.lock();
        let _ = runs.remove(run_id.as_str());
        gauge!("vox_runs_active").set(runs.len() as f64);
    }

    /// Check whether a run is live.
    pub fn has_active_run(&self, run_id: &RunId) -> bool {
        self.active_runs.lock().contains_key(run_id.as_str())
    }

    /// The assistant a live run belongs to, if the run is tracked.
    pub fn assistant_for(&self, run_id: &RunId) -> Option<AssistantId> {
        self.active_runs
            .lock()
            .get(run_id.as_str())
            .map(|run| run.assistant_id.clone())
    }

    /// Number of live runs.
    pub fn active_run_count(&self) -> usize {
        self.active_runs.lock().len()
    }

    /// Maximum concurrent run limit.
    pub fn max_concurrent_runs(&self) -> usize {
        self.max_concurrent_runs
    }

    /// Whether another run can start right now.
    pub fn can_accept_run(&self) -> bool {
        self.active_run_count() < self.max_concurrent_runs
    }

    /// Abort a live run by cancelling its token.
    /// Returns true if the run was tracked and its token cancelled.
    #[instrument(skip(self), fields(run_id = %run_id))]
    pub fn abort(&self, run_id: &RunId) -> bool {
        let runs = self.active_runs.lock();
        if let Some(run) = runs.get(run_id.as_str()) {
            warn!("abort requested");
            run.cancel.cancel();
            true
        } else {
            false
        }
    }

    /// Graceful shutdown — cancel every live run.
    #[instrument(skip(self))]
    pub fn shutdown(&self) {
        info!("coordinator shutdown initiated");
        let runs = self.active_runs.lock();
        for run in runs.values() {
            run.cancel.cancel();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
