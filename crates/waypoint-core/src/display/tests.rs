use serde_json::json;

use super::*;
use crate::{
    engine::IntentRun,
    models::{
        InputDescriptor, PassReport, PassStatus, Plan, ReplanResponse, Step, StepOutcome,
        ToolSchema,
    },
};

fn executed_plan() -> Plan {
    let mut step = Step::draft("book flight", "Book a flight to Berlin");
    step.tool = Some("flight_api".to_string());
    step.data = Some(ToolSchema {
        method: "book".to_string(),
        description: None,
        inputs: vec![InputDescriptor::named("destination")],
    });
    step.executed = true;
    step.tool_executed_result = Some(json!({"booking": "AB123"}));

    Plan::new("book a flight", vec![step, Step::draft("send email", "")])
}

#[test]
fn test_plan_display_shows_progress_and_bindings() {
    let output = executed_plan().to_string();

    assert!(output.starts_with("# book a flight\n"));
    assert!(output.contains("- Progress: 1/2 steps executed"));
    assert!(output.contains("### 1. book flight (✓ executed)"));
    assert!(output.contains("- Tool: `flight_api.book`"));
    assert!(output.contains("- Inputs: destination"));
    assert!(output.contains(r#"- Result: `{"booking":"AB123"}`"#));
    assert!(output.contains("### 2. send email (○ pending)"));
    assert!(output.contains("- Tool: unresolved"));
}

#[test]
fn test_pass_report_display() {
    let report = PassReport {
        status: PassStatus::NeedInput { index: 1 },
        outcomes: vec![(
            1,
            StepOutcome::need_input(
                "email_api",
                "Please input required arguments to continue: [recipient]",
            ),
        )],
        persisted: false,
    };

    let output = report.to_string();
    assert!(output.contains("## Waiting for input at step 2"));
    assert!(output.contains(
        "2. ? Needs input `email_api`: Please input required arguments to continue: [recipient]"
    ));
    assert!(!output.contains("stored for reuse"));
}

#[test]
fn test_completed_report_mentions_storage() {
    let report = PassReport {
        status: PassStatus::Completed,
        outcomes: vec![(0, StepOutcome::success("flight_api", json!("ok")))],
        persisted: true,
    };

    let output = report.to_string();
    assert!(output.contains("## Completed"));
    assert!(output.contains("1. ✓ Success `flight_api`: ok"));
    assert!(output.contains("Plan stored for reuse."));
}

#[test]
fn test_replan_failed_display() {
    let run = IntentRun::ReplanFailed(ReplanResponse::failed("no calendar tool"));
    let output = run.to_string();
    assert!(output.contains("Could not plan"));
    assert!(output.contains("no calendar tool"));
}

#[test]
fn test_delete_result_and_empty_collections() {
    assert_eq!(
        DeleteResult::new("plan context", 4).to_string(),
        "Deleted plan context with ID: 4\n"
    );
    assert_eq!(Tools(Vec::new()).to_string(), "No tools registered.\n");
    assert_eq!(Checkpoints(Vec::new()).to_string(), "No pending checkpoints.\n");
}
