//! Per-step execution state and the hand-off to plan-context memory.

use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::{
    error::Result,
    invoker::Invocation,
    models::{ExtractionVerdict, OutcomeStatus, Plan, Step, StepOutcome},
    services::PlanContextStore,
};

/// Mutates step state and checkpoints it through plan-context memory.
#[derive(Clone)]
pub struct StepStateTracker {
    store: Arc<dyn PlanContextStore>,
}

impl StepStateTracker {
    pub fn new(store: Arc<dyn PlanContextStore>) -> Self {
        Self { store }
    }

    /// Records a verified tool result for the step at `index`.
    ///
    /// The result is checkpointed before the step is touched, so a failed
    /// checkpoint leaves the step unexecuted.
    pub async fn record_success(
        &self,
        step: &mut Step,
        index: usize,
        result: &Value,
        verdict: &ExtractionVerdict,
        user_id: &str,
    ) -> Result<()> {
        self.store
            .update_step_status_context(index, result, true, user_id)
            .await?;

        step.executed = true;
        step.tool_executed_result = Some(result.clone());
        fold_extracted_metadata(step, verdict);
        debug!("step {index} ('{}') checkpointed", step.intent);
        Ok(())
    }

    /// Applies the continue/halt bookkeeping for an outcome.
    pub fn apply_outcome(step: &mut Step, outcome: &StepOutcome) {
        match outcome.status {
            OutcomeStatus::Success => {
                step.executed = true;
                step.tool_executed_result = Some(outcome.result.clone());
            }
            OutcomeStatus::Failure => {
                step.executed = true;
                step.tool_executed_result = Some(Invocation::failure_marker());
            }
            OutcomeStatus::NeedInput => {
                step.executed = false;
                step.tool_executed_result = None;
            }
        }
    }

    /// Hands a fully executed plan to plan-context memory.
    pub async fn persist(&self, plan: &Plan, user_id: &str) -> Result<()> {
        self.store.create_plan_context(plan, user_id).await
    }
}

/// Merges each extracted argument's metadata into the matching input
/// descriptor. The literal value is never stored on the step.
pub fn fold_extracted_metadata(step: &mut Step, verdict: &ExtractionVerdict) {
    let Some(schema) = step.data.as_mut() else {
        return;
    };
    let extracted = &verdict.extracted_arguments.required_arguments;

    for input in &mut schema.inputs {
        if let Some(record) = extracted.get(&input.name) {
            for (key, value) in &record.metadata {
                if key != "value" && key != "name" {
                    input.metadata.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::{
        error::EngineError,
        models::{ArgumentRecord, InputDescriptor, ToolSchema},
    };

    #[derive(Default)]
    struct RecordingStore {
        checkpoints: Mutex<Vec<(usize, Value, bool, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl PlanContextStore for RecordingStore {
        async fn create_plan_context(&self, _plan: &Plan, _user_id: &str) -> Result<()> {
            Ok(())
        }

        async fn update_step_status_context(
            &self,
            index: usize,
            execution_result: &Value,
            executed: bool,
            user_key: &str,
        ) -> Result<()> {
            if self.fail {
                return Err(EngineError::Configuration {
                    message: "store offline".to_string(),
                });
            }
            self.checkpoints.lock().unwrap().push((
                index,
                execution_result.clone(),
                executed,
                user_key.to_string(),
            ));
            Ok(())
        }

        async fn find_plan_context(&self, _user_id: &str, _intent: &str) -> Result<Option<Plan>> {
            Ok(None)
        }
    }

    fn bound_step() -> Step {
        let mut step = Step::draft("send email", "Send the confirmation");
        step.tool = Some("email_api".to_string());
        step.data = Some(ToolSchema {
            method: "send".to_string(),
            description: None,
            inputs: vec![
                InputDescriptor::named("recipient"),
                InputDescriptor::named("subject"),
            ],
        });
        step
    }

    fn verdict() -> ExtractionVerdict {
        let mut verdict = ExtractionVerdict::proceed([("recipient", json!("ops@example.com"))]);
        let record: &mut ArgumentRecord = verdict
            .extracted_arguments
            .required_arguments
            .get_mut("recipient")
            .unwrap();
        record
            .metadata
            .insert("source".to_string(), json!("second user message"));
        verdict
    }

    #[test]
    fn test_fold_strips_values() {
        let mut step = bound_step();
        fold_extracted_metadata(&mut step, &verdict());

        let inputs = &step.data.as_ref().unwrap().inputs;
        assert_eq!(inputs[0].metadata["source"], json!("second user message"));
        assert!(!inputs[0].metadata.contains_key("value"));
        assert!(inputs[1].metadata.is_empty());
    }

    #[tokio::test]
    async fn test_record_success_checkpoints_then_marks() {
        let store = Arc::new(RecordingStore::default());
        let tracker = StepStateTracker::new(store.clone());
        let mut step = bound_step();

        tracker
            .record_success(&mut step, 1, &json!({"sent": true}), &verdict(), "alice")
            .await
            .unwrap();

        assert!(step.executed);
        assert_eq!(step.tool_executed_result, Some(json!({"sent": true})));
        let checkpoints = store.checkpoints.lock().unwrap();
        assert_eq!(
            checkpoints.as_slice(),
            [(1, json!({"sent": true}), true, "alice".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_checkpoint_leaves_step_pending() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let tracker = StepStateTracker::new(store);
        let mut step = bound_step();

        let result = tracker
            .record_success(&mut step, 0, &json!(1), &verdict(), "alice")
            .await;
        assert!(result.is_err());
        assert!(!step.executed);
        assert!(step.tool_executed_result.is_none());
    }

    #[test]
    fn test_apply_outcome() {
        let mut step = bound_step();

        StepStateTracker::apply_outcome(&mut step, &StepOutcome::failure("email_api"));
        assert!(step.executed);
        assert_eq!(step.tool_executed_result, Some(json!({"status": "failure"})));

        StepStateTracker::apply_outcome(&mut step, &StepOutcome::need_input("email_api", "?"));
        assert!(!step.executed);
        assert!(step.tool_executed_result.is_none());
    }
}
