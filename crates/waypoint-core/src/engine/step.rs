//! Execution of a single plan step.

use super::Engine;
use crate::{
    error::{EngineError, Result},
    invoker::Invocation,
    models::{ChatMessage, Plan, StepOutcome, ToolConfig},
};

impl Engine {
    /// Extracts arguments for the step at `index`, invokes its tool, and
    /// classifies the result.
    ///
    /// Only the success path touches the step (checkpoint, executed flag,
    /// folded input metadata); failure and need-input bookkeeping is left to
    /// the pass.
    ///
    /// # Errors
    ///
    /// - `EngineError::InvalidInput` if `index` is out of range
    /// - `EngineError::UnboundStep` if the step has no tool or schema
    /// - `EngineError::MalformedModelOutput` if the extraction reply is
    ///   unreadable
    /// - any collaborator error from the model, tool caller, or store
    pub async fn execute_step(
        &self,
        history: &[ChatMessage],
        plan: &mut Plan,
        user_id: &str,
        index: usize,
    ) -> Result<StepOutcome> {
        let step = plan.steps.get(index).ok_or_else(|| {
            EngineError::invalid_input("index")
                .with_reason(format!("plan has {} step(s), got {index}", plan.steps.len()))
        })?;
        let config = ToolConfig::from_step(step, index)?;

        let verdict = self.extractor.extract(&config, history, plan, step).await?;
        if !verdict.can_proceed {
            let message = verdict.missing_prompt();
            self.emit(&message);
            return Ok(StepOutcome::need_input(config.tool, message));
        }

        match self.invoker.invoke(&config, &verdict).await? {
            Invocation::Failure { .. } => Ok(StepOutcome::failure(config.tool)),
            Invocation::Success(output) => {
                self.tracker
                    .record_success(&mut plan.steps[index], index, &output, &verdict, user_id)
                    .await?;
                Ok(StepOutcome::success(config.tool, output))
            }
        }
    }
}
