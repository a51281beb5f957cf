//! Phase sequencing and the continue/halt policy of a pass.

use log::{debug, info};

use super::{Engine, IntentRun};
use crate::{
    error::Result,
    models::{
        ChatMessage, OutcomeStatus, PassReport, PassStatus, Plan, ReplanStatus, Step,
        ToolCandidate,
    },
    resolver::aggregate_and_dedupe,
    tracker::StepStateTracker,
};

impl Engine {
    /// Runs a full turn for `intent`: planning, tool resolution, replanning,
    /// then one execution pass over the revised plan.
    pub async fn execute_intent(
        &self,
        intent: &str,
        history: &[ChatMessage],
        user_id: &str,
    ) -> Result<IntentRun> {
        self.emit(&format!("No stored plan for \"{intent}\", creating a new one"));
        let draft = self
            .context
            .intent_planner
            .create_execution_plan(intent)
            .await?;
        debug!("draft plan has {} step(s)", draft.len());

        let tool_pool = self.resolve_tool_pool(&draft).await?;
        let response = self
            .context
            .tool_planner
            .replan(intent, &tool_pool)
            .await?;

        if response.status == ReplanStatus::Failed {
            self.emit(&format!(
                "Replanning failed: {}",
                response.reason.as_deref().unwrap_or("no reason given")
            ));
            return Ok(IntentRun::ReplanFailed(response));
        }
        self.emit(&format!(
            "Replanned into {} step(s) over {} candidate tool(s)",
            response.plan.len(),
            tool_pool.len()
        ));

        let mut plan = Plan::new(intent, response.plan);
        let report = self.execute_plan(&mut plan, history, user_id).await?;
        Ok(IntentRun::Executed { plan, report })
    }

    /// Looks up candidates for every step and deduplicates them across the
    /// whole plan, so replanning sees the union of relevant tools.
    pub async fn resolve_tool_pool(&self, steps: &[Step]) -> Result<Vec<ToolCandidate>> {
        let mut found = Vec::new();
        for step in steps {
            self.emit(&format!("Finding a tool for step: {}", step.intent));
            found.extend(self.resolver.resolve(step).await?);
        }
        Ok(aggregate_and_dedupe(found))
    }

    /// Executes the plan's unexecuted steps in order until one fails or
    /// needs input.
    ///
    /// The plan is mutated in place and remains the caller's to inspect or
    /// resume. When this pass leaves every step executed, the plan is handed
    /// to plan-context memory once. A plan that was already complete on entry
    /// runs nothing and is not stored again.
    pub async fn execute_plan(
        &self,
        plan: &mut Plan,
        history: &[ChatMessage],
        user_id: &str,
    ) -> Result<PassReport> {
        let complete_on_entry = plan.is_fully_executed();
        let mut outcomes = Vec::new();
        let mut status = PassStatus::Completed;

        for index in 0..plan.steps.len() {
            if plan.steps[index].executed {
                continue;
            }

            let outcome = self.execute_step(history, plan, user_id, index).await?;
            StepStateTracker::apply_outcome(&mut plan.steps[index], &outcome);

            let halt = match outcome.status {
                OutcomeStatus::Success => None,
                OutcomeStatus::Failure => Some(PassStatus::Failed { index }),
                OutcomeStatus::NeedInput => Some(PassStatus::NeedInput { index }),
            };
            self.emit(&format!(
                "Step {} ({}): {}",
                index + 1,
                outcome.tool_name,
                outcome.status.as_str()
            ));
            outcomes.push((index, outcome));

            if let Some(halt) = halt {
                status = halt;
                break;
            }
        }

        let persisted = if status == PassStatus::Completed && !complete_on_entry {
            self.tracker.persist(plan, user_id).await?;
            info!("stored plan for \"{}\" (user {user_id})", plan.intent);
            true
        } else {
            false
        };

        Ok(PassReport {
            status,
            outcomes,
            persisted,
        })
    }

    /// Re-executes the most recent stored plan for this user and intent,
    /// skipping planning. Returns `None` when nothing is stored.
    pub async fn reuse_plan_context(
        &self,
        intent: &str,
        history: &[ChatMessage],
        user_id: &str,
    ) -> Result<Option<IntentRun>> {
        let Some(mut plan) = self
            .context
            .plan_contexts
            .find_plan_context(user_id, intent)
            .await?
        else {
            return Ok(None);
        };

        self.emit(&format!(
            "Reusing stored plan for \"{intent}\" ({} step(s))",
            plan.steps.len()
        ));
        plan.reset();
        let report = self.execute_plan(&mut plan, history, user_id).await?;
        Ok(Some(IntentRun::Executed { plan, report }))
    }
}
