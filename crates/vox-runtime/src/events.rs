//! Run lifecycle events.
//!
//! Broadcast to observers at stage boundaries and settlement. Informational
//! only — the authoritative per-stage results flow through the orchestrator's
//! output stream.

use serde::Serialize;

/// One run lifecycle event.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// A run began executing its task list.
    RunStarted {
        /// Run identity.
        run_id: String,
        /// Assistant being executed.
        assistant_id: String,
        /// Number of tasks in the pipeline.
        task_count: usize,
    },
    /// A stage began executing.
    StageStarted {
        /// Run identity.
        run_id: String,
        /// Stage index, 0-based.
        stage_index: usize,
    },
    /// A stage completed and its output was yielded.
    StageCompleted {
        /// Run identity.
        run_id: String,
        /// Stage index, 0-based.
        stage_index: usize,
    },
    /// A stage executor failed; the pipeline halted here.
    StageFailed {
        /// Run identity.
        run_id: String,
        /// Stage index, 0-based.
        stage_index: usize,
        /// Error description.
        message: String,
    },
    /// All stages completed.
    RunCompleted {
        /// Run identity.
        run_id: String,
    },
    /// The run's cost record was persisted.
    CostRecorded {
        /// Run identity.
        run_id: String,
        /// Sum of the known cost components.
        total: f64,
    },
}

impl RunEvent {
    /// Event type string (matches the serialized `type` tag).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::StageStarted { .. } => "stage_started",
            Self::StageCompleted { .. } => "stage_completed",
            Self::StageFailed { .. } => "stage_failed",
            Self::RunCompleted { .. } => "run_completed",
            Self::CostRecorded { .. } => "cost_recorded",
        }
    }

    /// Run this event belongs to.
    pub fn run_id(&self) -> &str {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::StageStarted { run_id, .. }
            | Self::StageCompleted { run_id, .. }
            | Self::StageFailed { run_id, .. }
            | Self::RunCompleted { run_id }
            | Self::CostRecorded { run_id, .. } => run_id,
        }
    }
}
