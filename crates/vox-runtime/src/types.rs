//! Agent configuration and run context types.
//!
//! [`AgentConfig`] is owned by the caller and read-only to the orchestrator.
//! Stage outputs are opaque JSON object maps — no internal schema is assumed
//! beyond "the next stage can consume it".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vox_core::cost::SynthesizerKind;
use vox_core::ids::{AssistantId, RunId, UserId};

/// Opaque output of one stage, input of the next.
pub type StageOutput = serde_json::Map<String, Value>;

/// Transcriber resource for one stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Backend identifier (e.g. `"deepgram"`).
    pub provider: String,
}

/// Synthesizer resource for one stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Backend family; drives speech-synthesis billing.
    pub provider: SynthesizerKind,
}

/// Language-model resource for one stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier the stage calls.
    pub model: String,
}

/// Resources one stage uses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Speech-to-text backend, if the stage listens.
    pub transcriber: Option<TranscriberConfig>,
    /// Speech-synthesis backend, if the stage speaks.
    pub synthesizer: Option<SynthesizerConfig>,
    /// Language model, if the stage reasons.
    pub llm: Option<LlmConfig>,
}

/// One unit of work in the ordered pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Stage kind (e.g. `"conversation"`, `"extraction"`, `"summarization"`).
    pub task_type: String,
    /// Resources the stage uses.
    #[serde(default)]
    pub tools_config: ToolsConfig,
}

/// Ordered task list for one assistant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Human-readable assistant name; passed to executors when loading
    /// stage prompts.
    pub assistant_name: String,
    /// Tasks in execution order.
    pub tasks: Vec<TaskSpec>,
}

impl AgentConfig {
    /// Synthesizer family of the primary (first) task, if any.
    ///
    /// Settlement takes the synthesizer kind as an explicit input; this is
    /// the helper callers use to derive it from configuration instead of
    /// the accountant reaching into orchestrator state.
    #[must_use]
    pub fn primary_synthesizer(&self) -> Option<SynthesizerKind> {
        self.tasks
            .first()
            .and_then(|task| task.tools_config.synthesizer.as_ref())
            .map(|s| s.provider)
    }
}

/// Shared context for every stage of one run.
#[derive(Clone, Debug)]
pub struct RunContext {
    /// Identity of this run, derived once at orchestrator construction.
    pub run_id: RunId,
    /// Owning user.
    pub user_id: UserId,
    /// Assistant being executed.
    pub assistant_id: AssistantId,
    /// Caller-provided template/context data, if any.
    pub context_data: Option<Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
