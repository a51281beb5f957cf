//! Interfaces to the collaborators the engine supervises.
//!
//! Every collaborator is an `async_trait` object so the application context
//! can hold production implementations and tests can hold doubles.

use async_trait::async_trait;
use log::info;
use serde_json::{Map, Value};

use crate::{
    error::Result,
    models::{
        ChatMessage, MemoryMatches, Plan, ReplanResponse, Step, ToolCallResult, ToolCandidate,
        ToolConfig,
    },
};

/// Sampling options for a completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
}

impl CompletionOptions {
    /// Deterministic-leaning sampling.
    pub const fn deterministic() -> Self {
        Self { temperature: 0.0 }
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self { temperature: 0.7 }
    }
}

/// Language-model completion: prompt in, text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        prompt: &[ChatMessage],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<String>;
}

/// Turns a free-text intent into draft steps.
#[async_trait]
pub trait IntentPlanner: Send + Sync {
    async fn create_execution_plan(&self, intent: &str) -> Result<Vec<Step>>;
}

/// Binds steps to concrete tools out of a candidate pool.
#[async_trait]
pub trait ToolPlanner: Send + Sync {
    async fn replan(&self, intent: &str, tool_pool: &[ToolCandidate]) -> Result<ReplanResponse>;
}

/// Similarity search over remembered steps and tools. `None` means the
/// memory has nothing for this description.
#[async_trait]
pub trait StepMemory: Send + Sync {
    async fn retrieve(&self, description: &str) -> Result<Option<MemoryMatches>>;
}

/// Durable memory of completed plans, scoped per user.
#[async_trait]
pub trait PlanContextStore: Send + Sync {
    /// Persists a fully executed plan.
    async fn create_plan_context(&self, plan: &Plan, user_id: &str) -> Result<()>;

    /// Records one step's result while the pass is still running.
    async fn update_step_status_context(
        &self,
        index: usize,
        execution_result: &Value,
        executed: bool,
        user_key: &str,
    ) -> Result<()>;

    /// Most recent stored plan for this user and intent.
    async fn find_plan_context(&self, user_id: &str, intent: &str) -> Result<Option<Plan>>;
}

/// Dispatches a call to a named tool method.
#[async_trait]
pub trait ToolCaller: Send + Sync {
    async fn call(
        &self,
        tool: &str,
        method: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallResult>;
}

/// Classification of a raw tool result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Success,
    Failure,
}

/// Decides whether a raw tool result counts as success.
#[async_trait]
pub trait ResultVerifier: Send + Sync {
    async fn verify(&self, config: &ToolConfig, result: &Value) -> Result<Verification>;
}

/// One-way sink for human-readable progress lines.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, message: &str);
}

/// Forwards progress lines to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn emit(&self, message: &str) {
        info!("{message}");
    }
}
