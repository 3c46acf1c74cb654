//! Stage executor collaborator traits.
//!
//! The logic inside each stage (transcription, dialogue, synthesis) is an
//! external concern. The orchestrator only needs two capabilities per
//! stage: load any stage-specific prompt/resource, then execute with the
//! previous stage's output. Executors are built per stage through the
//! injected factory so tests can substitute doubles.

use async_trait::async_trait;

use std::sync::Arc;

use crate::errors::BoxError;
use crate::types::{RunContext, StageOutput, TaskSpec};

/// Executes one stage of a run.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Load stage-specific prompts/resources before execution.
    async fn load_resources(
        &self,
        assistant_name: &str,
        stage_index: usize,
    ) -> Result<(), BoxError>;

    /// Execute the stage. `previous` is the prior stage's output, or `None`
    /// for the first stage. May suspend on backend calls.
    async fn execute(&self, previous: Option<StageOutput>) -> Result<StageOutput, BoxError>;
}

/// Builds a [`TaskExecutor`] bound to one stage of one run.
pub trait TaskExecutorFactory: Send + Sync {
    /// Create the executor for `spec` at `stage_index` within `ctx`.
    fn create(&self, spec: &TaskSpec, stage_index: usize, ctx: &RunContext)
    -> Arc<dyn TaskExecutor>;
}
