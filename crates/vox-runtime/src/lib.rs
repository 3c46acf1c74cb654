//! # vox-runtime
//!
//! Sequential task orchestration and run settlement.
//!
//! - **Pipeline**: [`TaskOrchestrator`] drives one run's ordered task list,
//!   yielding `(stage_index, output)` lazily as each stage completes
//! - **Executor seam**: [`TaskExecutor`] / [`TaskExecutorFactory`] — the
//!   per-stage logic lives behind these traits
//! - **Coordinator**: [`RunCoordinator`] tracks concurrent runs with a
//!   concurrency ceiling and per-run cancellation
//! - **Settlement**: [`RunFinalizer`] — call metadata → cost accounting →
//!   recording archival, with cost and archive failures reported distinctly
//! - **Events**: [`RunEvent`] broadcast through [`EventEmitter`]
//!
//! ## Crate Position
//!
//! Aggregation layer. Depends on: vox-core, vox-billing, vox-store,
//! vox-telephony.

#![deny(unsafe_code)]

pub mod archiver;
pub mod coordinator;
pub mod emitter;
pub mod errors;
pub mod events;
pub mod executor;
pub mod finalizer;
pub mod pipeline;
pub mod types;

// Re-export main public API
pub use archiver::RecordingArchiver;
pub use coordinator::RunCoordinator;
pub use emitter::EventEmitter;
pub use errors::{BoxError, RuntimeError};
pub use events::RunEvent;
pub use executor::{TaskExecutor, TaskExecutorFactory};
pub use finalizer::{RunFinalizer, RunSettlement};
pub use pipeline::TaskOrchestrator;
pub use types::{AgentConfig, RunContext, StageOutput, TaskSpec, ToolsConfig};
