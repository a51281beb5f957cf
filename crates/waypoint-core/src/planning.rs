//! Model-backed intent and tool planners.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::{
    error::{EngineError, Result},
    json::extract_json_from_str,
    models::{ChatMessage, ReplanResponse, Step, ToolCandidate},
    prompts,
    services::{CompletionOptions, IntentPlanner, LanguageModel, ToolPlanner},
};

/// Plans with the chat model: draft steps from an intent, then steps bound
/// to tools from a candidate pool.
#[derive(Clone)]
pub struct ModelPlanner {
    model: Arc<dyn LanguageModel>,
    model_name: String,
}

impl ModelPlanner {
    pub fn new(model: Arc<dyn LanguageModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    async fn ask(&self, prompt: String) -> Result<String> {
        self.model
            .complete(
                &[ChatMessage::user(prompt)],
                &self.model_name,
                &CompletionOptions::deterministic(),
            )
            .await
    }
}

#[async_trait]
impl IntentPlanner for ModelPlanner {
    async fn create_execution_plan(&self, intent: &str) -> Result<Vec<Step>> {
        let reply = self.ask(prompts::execution_plan(intent)).await?;
        let steps = parse_draft_steps(&reply)?;
        debug!("intent planner produced {} step(s)", steps.len());
        Ok(steps)
    }
}

#[async_trait]
impl ToolPlanner for ModelPlanner {
    async fn replan(&self, intent: &str, tool_pool: &[ToolCandidate]) -> Result<ReplanResponse> {
        let reply = self.ask(prompts::tool_based_plan(intent, tool_pool)).await?;
        parse_replan(&reply)
    }
}

/// Reads `{"steps": [...]}` or a bare step array.
pub fn parse_draft_steps(reply: &str) -> Result<Vec<Step>> {
    const CONTEXT: &str = "creating an execution plan";

    let steps = match extract_json_from_str(reply) {
        Some(Value::Object(mut object)) => object
            .remove("steps")
            .ok_or_else(|| EngineError::malformed(CONTEXT, reply))?,
        Some(array @ Value::Array(_)) => array,
        _ => return Err(EngineError::malformed(CONTEXT, reply)),
    };
    serde_json::from_value(steps)
        .map_err(|e| EngineError::malformed(CONTEXT, format!("{e}: {reply}")))
}

/// Reads a replan reply object.
pub fn parse_replan(reply: &str) -> Result<ReplanResponse> {
    const CONTEXT: &str = "replanning with tools";

    match extract_json_from_str(reply) {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map_err(|e| EngineError::malformed(CONTEXT, format!("{e}: {reply}"))),
        _ => Err(EngineError::malformed(CONTEXT, reply)),
    }
}
