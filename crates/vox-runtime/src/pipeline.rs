//! Sequential task pipeline for one run.
//!
//! `PENDING(0) → PENDING(1) → … → DONE`: stage i+1 never starts before
//! stage i's state flips, because its input *is* stage i's output. The
//! pipeline is exposed as a lazy stream — one `(index, output)` element per
//! stage, produced before the next stage starts — so callers can react
//! per-stage (e.g. forward to a live connection) before the run ends.
//!
//! Dropping the stream mid-run cancels the in-flight stage at its next
//! suspension point; the orchestrator defines no timeout policy of its own.

use async_stream::try_stream;
use futures::Stream;
use serde_json::Value;
use tracing::{debug, info, warn};

use std::sync::Arc;

use vox_core::ids::{AssistantId, RunId, UserId};

use crate::emitter::EventEmitter;
use crate::errors::RuntimeError;
use crate::events::RunEvent;
use crate::executor::{TaskExecutor, TaskExecutorFactory};
use crate::types::{AgentConfig, RunContext, StageOutput, TaskSpec};

/// Drives one run's ordered task list.
///
/// Owns the execution state exclusively; concurrent runs use separate
/// orchestrator instances and share nothing but the external stores.
pub struct TaskOrchestrator {
    config: AgentConfig,
    ctx: RunContext,
    task_states: Vec<bool>,
    factory: Arc<dyn TaskExecutorFactory>,
    emitter: Arc<EventEmitter>,
}

impl TaskOrchestrator {
    /// Create an orchestrator for one run.
    ///
    /// The run identity is derived here, exactly once, and is stable for
    /// the orchestrator's lifetime.
    pub fn new(
        config: AgentConfig,
        user_id: UserId,
        assistant_id: AssistantId,
        context_data: Option<Value>,
        factory: Arc<dyn TaskExecutorFactory>,
    ) -> Self {
        let run_id = RunId::derive(&assistant_id);
        let task_states = vec![false; config.tasks.len()];
        Self {
            config,
            ctx: RunContext {
                run_id,
                user_id,
                assistant_id,
                context_data,
            },
            task_states,
            factory,
            emitter: Arc::new(EventEmitter::new()),
        }
    }

    /// Share an existing emitter instead of the orchestrator-local one.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<EventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// This run's identity.
    pub fn run_id(&self) -> &RunId {
        &self.ctx.run_id
    }

    /// Shared context handed to every stage executor.
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Per-stage completion flags, in task order.
    pub fn task_states(&self) -> &[bool] {
        &self.task_states
    }

    /// Emitter carrying this run's lifecycle events.
    pub fn emitter(&self) -> &Arc<EventEmitter> {
        &self.emitter
    }

    /// Execute the task list in order, yielding `(stage_index, output)` as
    /// each stage completes.
    ///
    /// The stream is finite — exactly one element per task on success — and
    /// a single stream is not restartable. Calling `run` again re-executes
    /// from scratch (completion flags reset). If a stage executor fails the
    /// error is yielded and the stream ends; pairs already yielded stand and
    /// later completion flags stay false.
    pub fn run(
        &mut self,
    ) -> impl Stream<Item = Result<(usize, StageOutput), RuntimeError>> + '_ {
        try_stream! {
            self.task_states.fill(false);
            let assistant_name = self.config.assistant_name.clone();
            let task_count = self.config.tasks.len();

            info!(run_id = %self.ctx.run_id, task_count, "starting run");
            let _ = self.emitter.emit(RunEvent::RunStarted {
                run_id: self.ctx.run_id.to_string(),
                assistant_id: self.ctx.assistant_id.to_string(),
                task_count,
            });

            let mut previous: Option<StageOutput> = None;
            for index in 0..task_count {
                let spec = self.config.tasks[index].clone();
                debug!(run_id = %self.ctx.run_id, stage = index, task_type = %spec.task_type, "stage starting");
                let _ = self.emitter.emit(RunEvent::StageStarted {
                    run_id: self.ctx.run_id.to_string(),
                    stage_index: index,
                });

                let executor = self.factory.create(&spec, index, &self.ctx);
                let mut output = Self::execute_stage(
                    executor.as_ref(),
                    &assistant_name,
                    index,
                    previous.take(),
                    &self.ctx,
                    &self.emitter,
                )
                .await?;

                let _ = output.insert(
                    "run_id".to_string(),
                    Value::String(self.ctx.run_id.to_string()),
                );
                self.task_states[index] = true;

                debug!(run_id = %self.ctx.run_id, stage = index, "stage completed");
                let _ = self.emitter.emit(RunEvent::StageCompleted {
                    run_id: self.ctx.run_id.to_string(),
                    stage_index: index,
                });

                previous = Some(output.clone());
                yield (index, output);
            }

            info!(run_id = %self.ctx.run_id, "run completed");
            let _ = self.emitter.emit(RunEvent::RunCompleted {
                run_id: self.ctx.run_id.to_string(),
            });
        }
    }

    /// Load the stage's resources and execute it, wrapping any executor
    /// failure into [`RuntimeError::Stage`].
    async fn execute_stage(
        executor: &dyn TaskExecutor,
        assistant_name: &str,
        index: usize,
        previous: Option<StageOutput>,
        ctx: &RunContext,
        emitter: &EventEmitter,
    ) -> Result<StageOutput, RuntimeError> {
        let attempt = async {
            executor.load_resources(assistant_name, index).await?;
            executor.execute(previous).await
        };

        match attempt.await {
            Ok(output) => Ok(output),
            Err(e) => {
                let err = RuntimeError::Stage {
                    index,
                    message: e.to_string(),
                };
                warn!(run_id = %ctx.run_id, stage = index, error = %err, "stage executor failed");
                let _ = emitter.emit(RunEvent::StageFailed {
                    run_id: ctx.run_id.to_string(),
                    stage_index: index,
                    message: e.to_string(),
                });
                Err(err)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
