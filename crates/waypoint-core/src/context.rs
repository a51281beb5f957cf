//! The application context: every collaborator the engine talks to,
//! constructed once at startup.

use std::sync::Arc;

use crate::{
    error::{EngineError, Result},
    services::{
        IntentPlanner, LanguageModel, LogProgress, PlanContextStore, ProgressSink,
        ResultVerifier, StepMemory, ToolCaller, ToolPlanner,
    },
    verify::StatusVerifier,
};

/// Model used for argument extraction when none is configured.
pub const DEFAULT_QUALITY_MODEL: &str = "gpt-4o";

/// Shared handles to all collaborators plus the model used for extraction.
#[derive(Clone)]
pub struct AppContext {
    pub model: Arc<dyn LanguageModel>,
    pub intent_planner: Arc<dyn IntentPlanner>,
    pub tool_planner: Arc<dyn ToolPlanner>,
    pub step_memory: Arc<dyn StepMemory>,
    pub plan_contexts: Arc<dyn PlanContextStore>,
    pub tool_caller: Arc<dyn ToolCaller>,
    pub verifier: Arc<dyn ResultVerifier>,
    pub progress: Arc<dyn ProgressSink>,
    pub quality_model: String,
}

/// Builder for creating and configuring an [`AppContext`].
#[derive(Default)]
pub struct AppContextBuilder {
    model: Option<Arc<dyn LanguageModel>>,
    intent_planner: Option<Arc<dyn IntentPlanner>>,
    tool_planner: Option<Arc<dyn ToolPlanner>>,
    step_memory: Option<Arc<dyn StepMemory>>,
    plan_contexts: Option<Arc<dyn PlanContextStore>>,
    tool_caller: Option<Arc<dyn ToolCaller>>,
    verifier: Option<Arc<dyn ResultVerifier>>,
    progress: Option<Arc<dyn ProgressSink>>,
    quality_model: Option<String>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_intent_planner(mut self, planner: Arc<dyn IntentPlanner>) -> Self {
        self.intent_planner = Some(planner);
        self
    }

    pub fn with_tool_planner(mut self, planner: Arc<dyn ToolPlanner>) -> Self {
        self.tool_planner = Some(planner);
        self
    }

    pub fn with_step_memory(mut self, memory: Arc<dyn StepMemory>) -> Self {
        self.step_memory = Some(memory);
        self
    }

    pub fn with_plan_contexts(mut self, store: Arc<dyn PlanContextStore>) -> Self {
        self.plan_contexts = Some(store);
        self
    }

    pub fn with_tool_caller(mut self, caller: Arc<dyn ToolCaller>) -> Self {
        self.tool_caller = Some(caller);
        self
    }

    /// Overrides the default [`StatusVerifier`].
    pub fn with_verifier(mut self, verifier: Arc<dyn ResultVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Overrides the default [`LogProgress`] sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the model name used for argument extraction.
    pub fn with_quality_model(mut self, name: impl Into<String>) -> Self {
        self.quality_model = Some(name.into());
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` naming the first required
    /// collaborator that was not supplied.
    pub fn build(self) -> Result<AppContext> {
        Ok(AppContext {
            model: required(self.model, "language model")?,
            intent_planner: required(self.intent_planner, "intent planner")?,
            tool_planner: required(self.tool_planner, "tool planner")?,
            step_memory: required(self.step_memory, "step memory")?,
            plan_contexts: required(self.plan_contexts, "plan context store")?,
            tool_caller: required(self.tool_caller, "tool caller")?,
            verifier: self.verifier.unwrap_or_else(|| Arc::new(StatusVerifier)),
            progress: self.progress.unwrap_or_else(|| Arc::new(LogProgress)),
            quality_model: self
                .quality_model
                .unwrap_or_else(|| DEFAULT_QUALITY_MODEL.to_string()),
        })
    }
}

fn required<T: ?Sized>(value: Option<Arc<T>>, name: &str) -> Result<Arc<T>> {
    value.ok_or_else(|| EngineError::Configuration {
        message: format!("missing {name}"),
    })
}
