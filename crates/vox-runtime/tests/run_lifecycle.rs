//! End-to-end run lifecycle: pipeline execution, then post-call settlement
//! against a mocked telephony provider with real SQLite and filesystem
//! stores.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vox_billing::accountant::{CostAccountant, RunUsage};
use vox_billing::estimator::TokenCostEstimator;
use vox_billing::pricing::PricingTable;
use vox_billing::tokenizer::TokenCounter;
use vox_core::ids::{AssistantId, CallId, RunKey, UserId};
use vox_core::messages::ChatMessage;
use vox_runtime::archiver::RecordingArchiver;
use vox_runtime::coordinator::RunCoordinator;
use vox_runtime::errors::BoxError;
use vox_runtime::executor::{TaskExecutor, TaskExecutorFactory};
use vox_runtime::finalizer::RunFinalizer;
use vox_runtime::pipeline::TaskOrchestrator;
use vox_runtime::types::{AgentConfig, RunContext, StageOutput, TaskSpec};
use vox_store::connection::{ConnectionConfig, new_in_memory};
use vox_store::object_store::{FsObjectStore, ObjectStore};
use vox_store::run_store::{RunStore, SqliteRunStore};
use vox_telephony::client::{HttpTelephonyClient, TelephonyClient, TelephonyConfig};

struct ByteCounter;

impl TokenCounter for ByteCounter {
    fn count(&self, text: &str) -> usize {
        text.len()
    }
}

/// Labels its stage and echoes the conversation state forward.
struct LabelingExecutor {
    stage_index: usize,
}

#[async_trait]
impl TaskExecutor for LabelingExecutor {
    async fn load_resources(&self, _assistant_name: &str, _stage_index: usize) -> Result<(), BoxError> {
        Ok(())
    }

    async fn execute(&self, _previous: Option<StageOutput>) -> Result<StageOutput, BoxError> {
        let value = json!({ "label": format!("stage-{}", self.stage_index) });
        Ok(value.as_object().unwrap().clone())
    }
}

struct LabelingFactory;

impl TaskExecutorFactory for LabelingFactory {
    fn create(
        &self,
        _spec: &TaskSpec,
        stage_index: usize,
        _ctx: &RunContext,
    ) -> Arc<dyn TaskExecutor> {
        Arc::new(LabelingExecutor { stage_index })
    }
}

async fn mock_provider() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2010-04-01/Accounts/AC1/Calls/CA1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sid": "CA1",
            "duration": "120",
            "price": "-0.02600",
            "to_formatted": "+1 555-000-1111"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2010-04-01/Accounts/AC1/Recordings.json"))
        .and(query_param("CallSid", "CA1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordings": [
                {"sid": "RE1", "uri": "/2010-04-01/Accounts/AC1/Recordings/RE1.json"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2010-04-01/Accounts/AC1/Recordings/RE1.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"call audio".to_vec()))
        .mount(&server)
        .await;

    server
}

fn agent_config() -> AgentConfig {
    serde_json::from_value(json!({
        "assistant_name": "closer",
        "tasks": [
            {
                "task_type": "conversation",
                "tools_config": {
                    "transcriber": {"provider": "deepgram"},
                    "synthesizer": {"provider": "polly"},
                    "llm": {"model": "gpt-3.5-turbo"}
                }
            },
            {"task_type": "extraction"}
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn full_run_then_settlement() {
    let server = mock_provider().await;

    // ── Execute the pipeline ─────────────────────────────────────────────
    let config = agent_config();
    let synthesizer = config.primary_synthesizer().unwrap();
    let coordinator = RunCoordinator::new(4);

    let mut orchestrator = TaskOrchestrator::new(
        config,
        UserId::from("u1"),
        AssistantId::from("a1"),
        Some(json!({"recipient": "Sam"})),
        Arc::new(LabelingFactory),
    )
    .with_emitter(Arc::clone(coordinator.broadcast()));

    let run_id = orchestrator.run_id().clone();
    let cancel = coordinator
        .start_run(&run_id, &AssistantId::from("a1"))
        .unwrap();

    let outputs: Vec<_> = orchestrator
        .run()
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .map(|item| item.unwrap())
        .collect();

    coordinator.complete_run(&run_id);
    assert!(!cancel.is_cancelled());
    assert!(!coordinator.has_active_run(&run_id));

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].1["label"], Value::from("stage-0"));
    assert_eq!(outputs[1].1["label"], Value::from("stage-1"));
    assert!(orchestrator.task_states().iter().all(|&done| done));

    // ── Settle the completed call ────────────────────────────────────────
    let telephony: Arc<dyn TelephonyClient> = Arc::new(HttpTelephonyClient::new(TelephonyConfig {
        base_url: server.uri(),
        account_sid: "AC1".into(),
        auth_token: "token".into(),
    }));

    let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
    let run_store = Arc::new(SqliteRunStore::new(pool).unwrap());
    let dir = tempfile::tempdir().unwrap();
    let object_store = Arc::new(FsObjectStore::new(dir.path()));

    let accountant = CostAccountant::new(
        TokenCostEstimator::new(Arc::new(ByteCounter), PricingTable::default()),
        Arc::clone(&run_store) as Arc<dyn RunStore>,
    );
    let archiver = RecordingArchiver::new(
        Arc::clone(&telephony),
        Arc::clone(&object_store) as Arc<dyn ObjectStore>,
        "vox",
    );
    let finalizer = RunFinalizer::new(telephony, accountant, archiver);

    let key = RunKey::new(UserId::from("u1"), AssistantId::from("a1"), run_id);
    let usage = RunUsage {
        transcript: vec![
            ChatMessage::system("You are closing a sale."),
            ChatMessage::user("I'd like to order."),
            ChatMessage::assistant("Great, let's confirm the details."),
        ],
        stage_labels: outputs
            .iter()
            .map(|(_, output)| output["label"].as_str().unwrap().to_string())
            .collect(),
        transcriber_chars: 48,
        synthesizer_chars: 2_000,
        synthesizer,
    };

    let settlement = finalizer
        .finalize(&key, &CallId::from("CA1"), &usage)
        .await
        .unwrap();

    // Cost record: provider price verbatim, duration-based transcription,
    // character-billed synthesis.
    assert_eq!(settlement.record.telephony_cost, Some(-0.026));
    assert_eq!(settlement.record.duration_secs, 120);
    assert!((settlement.record.transcription_cost - 0.0086).abs() < 1e-9);
    assert!((settlement.record.tts_cost - 0.032).abs() < 1e-9);
    assert!(settlement.record.llm_cost > 0.0);
    assert!(settlement.record.recording_url.ends_with("/Recordings/RE1.mp3"));

    // Persisted under the run key.
    let stored = run_store.get_run(&key).unwrap().unwrap();
    assert_eq!(stored, settlement.record);

    // Recording archived under user/assistant/run.
    let object_key = settlement.recording.unwrap();
    assert_eq!(object_key, format!("u1/a1/{}.mp3", key.run_id));
    let audio = object_store.get("vox", &object_key).await.unwrap().unwrap();
    assert_eq!(audio.as_ref(), b"call audio");
}
