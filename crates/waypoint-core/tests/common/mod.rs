#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tempfile::TempDir;
use waypoint_core::{
    AppContextBuilder, ChatMessage, Engine, EngineError, IntentPlanner, LanguageModel,
    PlanContextMemory, PlanContextMemoryBuilder, PlanContextStore, ProgressSink, ReplanResponse,
    Result, StepMemory, ToolCaller, ToolPlanner,
    models::{InputDescriptor, MemoryMatches, Plan, Step, ToolCallResult, ToolCandidate, ToolSchema},
    services::CompletionOptions,
};

/// Helper function to create a plan context memory in a temporary directory
pub async fn create_test_memory() -> (TempDir, PlanContextMemory) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let memory = PlanContextMemoryBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create plan context memory");
    (temp_dir, memory)
}

/// Language model that answers with queued replies and records prompts.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<(String, String, f32)>>,
}

impl ScriptedModel {
    pub fn push(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(reply.into());
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        prompt: &[ChatMessage],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let text = prompt
            .iter()
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts
            .lock()
            .unwrap()
            .push((text, model.to_string(), options.temperature));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| EngineError::LanguageModel {
                message: "no scripted reply left".to_string(),
            })
    }
}

/// Intent planner returning fixed draft steps.
#[derive(Default)]
pub struct FixedIntentPlanner {
    pub steps: Mutex<Vec<Step>>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl IntentPlanner for FixedIntentPlanner {
    async fn create_execution_plan(&self, intent: &str) -> Result<Vec<Step>> {
        self.calls.lock().unwrap().push(intent.to_string());
        Ok(self.steps.lock().unwrap().clone())
    }
}

/// Tool planner returning a fixed response and recording the pools it saw.
#[derive(Default)]
pub struct FixedToolPlanner {
    pub response: Mutex<ReplanResponse>,
    pub pools: Mutex<Vec<Vec<ToolCandidate>>>,
}

#[async_trait]
impl ToolPlanner for FixedToolPlanner {
    async fn replan(&self, _intent: &str, tool_pool: &[ToolCandidate]) -> Result<ReplanResponse> {
        self.pools.lock().unwrap().push(tool_pool.to_vec());
        Ok(self.response.lock().unwrap().clone())
    }
}

/// Step memory keyed by exact lookup text.
#[derive(Default)]
pub struct MapStepMemory {
    pub matches: Mutex<HashMap<String, Vec<ToolCandidate>>>,
}

impl MapStepMemory {
    pub fn insert(&self, text: &str, candidates: Vec<ToolCandidate>) {
        self.matches
            .lock()
            .unwrap()
            .insert(text.to_string(), candidates);
    }
}

#[async_trait]
impl StepMemory for MapStepMemory {
    async fn retrieve(&self, description: &str) -> Result<Option<MemoryMatches>> {
        Ok(self
            .matches
            .lock()
            .unwrap()
            .get(description)
            .cloned()
            .map(|matches| MemoryMatches { matches }))
    }
}

/// Plan-context store that keeps everything in memory.
#[derive(Default)]
pub struct RecordingStore {
    pub stored: Mutex<Vec<(Plan, String)>>,
    pub checkpoints: Mutex<Vec<(usize, Value, bool, String)>>,
}

impl RecordingStore {
    pub fn stored_count(&self) -> usize {
        self.stored.lock().unwrap().len()
    }
}

#[async_trait]
impl PlanContextStore for RecordingStore {
    async fn create_plan_context(&self, plan: &Plan, user_id: &str) -> Result<()> {
        self.stored
            .lock()
            .unwrap()
            .push((plan.clone(), user_id.to_string()));
        Ok(())
    }

    async fn update_step_status_context(
        &self,
        index: usize,
        execution_result: &Value,
        executed: bool,
        user_key: &str,
    ) -> Result<()> {
        self.checkpoints.lock().unwrap().push((
            index,
            execution_result.clone(),
            executed,
            user_key.to_string(),
        ));
        Ok(())
    }

    async fn find_plan_context(&self, user_id: &str, intent: &str) -> Result<Option<Plan>> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(plan, user)| user == user_id && plan.intent == intent)
            .map(|(plan, _)| plan.clone()))
    }
}

/// Tool caller with one canned output per tool.
#[derive(Default)]
pub struct ScriptedCaller {
    outputs: Mutex<HashMap<String, Value>>,
    pub calls: Mutex<Vec<(String, String, Map<String, Value>)>>,
}

impl ScriptedCaller {
    pub fn set(&self, tool: &str, output: Value) {
        self.outputs.lock().unwrap().insert(tool.to_string(), output);
    }

    pub fn tools_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(tool, _, _)| tool.clone())
            .collect()
    }
}

#[async_trait]
impl ToolCaller for ScriptedCaller {
    async fn call(
        &self,
        tool: &str,
        method: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallResult> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.to_string(), method.to_string(), arguments));
        let output = self.outputs.lock().unwrap().get(tool).cloned().ok_or_else(|| {
            EngineError::ToolNotFound {
                tool: tool.to_string(),
            }
        })?;
        Ok(ToolCallResult::new(output))
    }
}

/// Progress sink that keeps every line.
#[derive(Default)]
pub struct CollectingProgress {
    pub lines: Mutex<Vec<String>>,
}

impl ProgressSink for CollectingProgress {
    fn emit(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

/// Every collaborator as a double, plus the engine wired to them.
#[derive(Default)]
pub struct TestBed {
    pub model: Arc<ScriptedModel>,
    pub intent_planner: Arc<FixedIntentPlanner>,
    pub tool_planner: Arc<FixedToolPlanner>,
    pub memory: Arc<MapStepMemory>,
    pub store: Arc<RecordingStore>,
    pub caller: Arc<ScriptedCaller>,
    pub progress: Arc<CollectingProgress>,
}

impl TestBed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> Engine {
        let context = AppContextBuilder::new()
            .with_model(self.model.clone())
            .with_intent_planner(self.intent_planner.clone())
            .with_tool_planner(self.tool_planner.clone())
            .with_step_memory(self.memory.clone())
            .with_plan_contexts(self.store.clone())
            .with_tool_caller(self.caller.clone())
            .with_progress(self.progress.clone())
            .with_quality_model("quality-test")
            .build()
            .expect("all collaborators are set");
        Engine::new(context)
    }
}

/// A step already bound to `tool` with the given inputs.
pub fn bound_step(intent: &str, tool: &str, method: &str, inputs: &[&str]) -> Step {
    let mut step = Step::draft(intent, format!("{intent} using {tool}"));
    step.tool = Some(tool.to_string());
    step.data = Some(ToolSchema {
        method: method.to_string(),
        description: None,
        inputs: inputs.iter().map(|name| InputDescriptor::named(*name)).collect(),
    });
    step
}

/// A candidate with a tool name in its metadata.
pub fn candidate(id: &str, tool: &str) -> ToolCandidate {
    let mut metadata = Map::new();
    metadata.insert("tool".to_string(), json!(tool));
    ToolCandidate {
        id: Some(id.to_string()),
        score: Some(0.9),
        metadata,
    }
}

/// Extraction reply that lets the step proceed with `arguments`.
pub fn proceed_reply(arguments: &[(&str, Value)]) -> String {
    let required: Map<String, Value> = arguments
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                json!({"value": value, "source": "conversation"}),
            )
        })
        .collect();
    json!({
        "can_proceed": true,
        "missing_required_arguments": [],
        "extracted_arguments": {"required_arguments": required}
    })
    .to_string()
}

/// Extraction reply that halts the step for `names`.
pub fn missing_reply(names: &[&str]) -> String {
    json!({
        "can_proceed": false,
        "missing_required_arguments": names,
        "extracted_arguments": {"required_arguments": {}}
    })
    .to_string()
}
