//! Argument extraction through the language model.

use std::sync::Arc;

use log::debug;

use crate::{
    error::{EngineError, Result},
    json::extract_object_from_str,
    models::{ChatMessage, ExtractionVerdict, Plan, Step, ToolConfig},
    prompts,
    services::{CompletionOptions, LanguageModel},
};

const CONTEXT: &str = "extracting tool arguments";

/// Asks the quality model whether a step's arguments are available.
#[derive(Clone)]
pub struct ArgumentExtractor {
    model: Arc<dyn LanguageModel>,
    model_name: String,
}

impl ArgumentExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// Builds a single-turn prompt and parses the reply at temperature 0.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MalformedModelOutput` when the reply holds no
    /// JSON object or the object is not a verdict. An unreadable reply is
    /// never taken to mean "no arguments needed".
    pub async fn extract(
        &self,
        config: &ToolConfig,
        history: &[ChatMessage],
        plan: &Plan,
        step: &Step,
    ) -> Result<ExtractionVerdict> {
        let prompt = vec![ChatMessage::user(prompts::argument_extraction(
            config, history, plan, step,
        ))];
        let reply = self
            .model
            .complete(&prompt, &self.model_name, &CompletionOptions::deterministic())
            .await?;

        let verdict = parse_verdict(&reply)?;
        debug!(
            "verdict for {}.{}: can_proceed={} missing={:?}",
            config.tool, config.method, verdict.can_proceed, verdict.missing_required_arguments
        );
        Ok(verdict)
    }
}

/// Parses a raw model reply into a verdict.
pub fn parse_verdict(reply: &str) -> Result<ExtractionVerdict> {
    let value =
        extract_object_from_str(reply).ok_or_else(|| EngineError::malformed(CONTEXT, reply))?;
    let mut verdict: ExtractionVerdict = serde_json::from_value(value)
        .map_err(|e| EngineError::malformed(CONTEXT, format!("{e}: {reply}")))?;

    if verdict.can_proceed {
        verdict.missing_required_arguments.clear();
    }
    Ok(verdict)
}
