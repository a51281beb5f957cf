//! The plan execution engine.
//!
//! The engine drives one user turn through its phases:
//!
//! ```text
//! ┌──────────┐   ┌────────────────┐   ┌────────────┐   ┌───────────┐
//! │ Planning │──▶│ ToolResolution │──▶│ Replanning │──▶│ Executing │──▶ Completed
//! └──────────┘   └────────────────┘   └────────────┘   └───────────┘──▶ Halted
//! ```
//!
//! - **Planning**: one call to the intent planner for draft steps.
//! - **ToolResolution**: every draft step is looked up in step memory and the
//!   candidates of the whole plan are deduplicated into one pool.
//! - **Replanning**: the tool planner binds steps to tools from the pool. A
//!   `failed` reply ends the turn before any step runs.
//! - **Executing**: steps run in order, one at a time. Executed steps are
//!   skipped, so calling [`Engine::execute_plan`] again on the same plan
//!   resumes where the last pass stopped. A failure or a need-input outcome
//!   halts the pass.
//!
//! A pass that leaves every step executed hands the plan to plan-context
//! memory for the acting user. Nothing is retried inside a pass.
//!
//! # Submodules
//!
//! - [`pass`]: phase sequencing and the continue/halt policy
//! - [`step`]: execution of a single step

use log::debug;

use crate::{
    context::AppContext,
    extractor::ArgumentExtractor,
    invoker::ToolInvoker,
    models::{Plan, PassReport, ReplanResponse},
    resolver::ToolResolver,
    tracker::StepStateTracker,
};

pub mod pass;
pub mod step;


/// What one `execute_intent` call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentRun {
    /// The tool planner gave up; no step was executed.
    ReplanFailed(ReplanResponse),

    /// A revised plan was executed (fully or up to a halt).
    Executed { plan: Plan, report: PassReport },
}

/// Plan execution engine bound to one application context.
pub struct Engine {
    pub(crate) context: AppContext,
    pub(crate) resolver: ToolResolver,
    pub(crate) extractor: ArgumentExtractor,
    pub(crate) invoker: ToolInvoker,
    pub(crate) tracker: StepStateTracker,
}

impl Engine {
    /// Wires the engine's components from the context's collaborators.
    pub fn new(context: AppContext) -> Self {
        debug!("engine using quality model {}", context.quality_model);
        Self {
            resolver: ToolResolver::new(context.step_memory.clone()),
            extractor: ArgumentExtractor::new(
                context.model.clone(),
                context.quality_model.clone(),
            ),
            invoker: ToolInvoker::new(context.tool_caller.clone(), context.verifier.clone()),
            tracker: StepStateTracker::new(context.plan_contexts.clone()),
            context,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub(crate) fn emit(&self, message: &str) {
        self.context.progress.emit(message);
    }
}
