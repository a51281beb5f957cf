//! Tests for the models module.

use serde_json::{Value, json};

use super::*;
use crate::error::EngineError;

#[test]
fn test_step_data_from_object() {
    let step: Step = serde_json::from_value(json!({
        "intent": "send email",
        "description": "Send the confirmation email",
        "tool": "email_api",
        "data": {
            "method": "send",
            "inputs": [
                {"name": "recipient", "type": "string", "required": true},
                {"name": "subject", "type": "string", "required": false}
            ]
        }
    }))
    .expect("step should parse");

    let schema = step.data.expect("schema present");
    assert_eq!(schema.method, "send");
    assert_eq!(schema.inputs.len(), 2);
    assert_eq!(schema.inputs[0].name, "recipient");
    assert!(schema.inputs[0].is_required());
    assert!(!schema.inputs[1].is_required());
    assert_eq!(schema.inputs[1].metadata["type"], json!("string"));
}

#[test]
fn test_step_data_from_fenced_string() {
    let step: Step = serde_json::from_value(json!({
        "intent": "book flight",
        "tool": "flight_api",
        "data": "```json\n{\"method\": \"book\", \"inputs\": [\"origin\", {\"name\": \"destination\"}]}\n```"
    }))
    .expect("step should parse");

    let schema = step.data.expect("schema present");
    assert_eq!(schema.method, "book");
    let names: Vec<_> = schema.inputs.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["origin", "destination"]);
}

#[test]
fn test_step_data_rejects_garbage_string() {
    let result = serde_json::from_value::<Step>(json!({
        "intent": "book flight",
        "data": "no schema here"
    }));
    assert!(result.is_err());
}

#[test]
fn test_draft_step_defaults() {
    let step: Step = serde_json::from_value(json!({"intent": "book flight"})).unwrap();
    assert_eq!(step.intent, "book flight");
    assert!(step.tool.is_none());
    assert!(step.data.is_none());
    assert!(!step.executed);
    assert!(step.tool_executed_result.is_none());
    assert_eq!(step.lookup_text(), "book flight");
}

#[test]
fn test_step_serializes_without_empty_fields() {
    let step = Step::draft("book flight", "Book a flight");
    let value = serde_json::to_value(&step).unwrap();
    assert!(value.get("tool").is_none());
    assert!(value.get("data").is_none());
    assert_eq!(value["executed"], json!(false));
}

#[test]
fn test_plan_execution_helpers() {
    let mut plan = Plan::new(
        "two things",
        vec![Step::draft("a", "first"), Step::draft("b", "second")],
    );
    assert_eq!(plan.next_pending(), Some(0));

    plan.steps[0].executed = true;
    plan.steps[0].tool_executed_result = Some(json!({"ok": true}));
    assert_eq!(plan.next_pending(), Some(1));
    assert_eq!(plan.executed_count(), 1);
    assert!(!plan.is_fully_executed());

    plan.steps[1].executed = true;
    assert!(plan.is_fully_executed());

    plan.reset();
    assert_eq!(plan.executed_count(), 0);
    assert!(plan.steps[0].tool_executed_result.is_none());
}

#[test]
fn test_tool_config_requires_binding() {
    let unbound = Step::draft("book flight", "");
    let err = ToolConfig::from_step(&unbound, 3).unwrap_err();
    assert!(matches!(err, EngineError::UnboundStep { index: 3, .. }));

    let mut no_schema = Step::draft("book flight", "");
    no_schema.tool = Some("flight_api".to_string());
    assert!(ToolConfig::from_step(&no_schema, 0).is_err());
}

#[test]
fn test_tool_config_from_bound_step() {
    let mut step = Step::draft("book flight", "");
    step.tool = Some("flight_api".to_string());
    step.data = Some(ToolSchema {
        method: "book".to_string(),
        description: None,
        inputs: vec![InputDescriptor::named("destination")],
    });

    let config = ToolConfig::from_step(&step, 0).unwrap();
    assert_eq!(config.tool, "flight_api");
    assert_eq!(config.method, "book");
    assert_eq!(config.inputs.len(), 1);
}

#[test]
fn test_verdict_parses_proceed() {
    let verdict: ExtractionVerdict = serde_json::from_value(json!({
        "can_proceed": true,
        "extracted_arguments": {
            "required_arguments": {
                "destination": {"value": "Berlin", "source": "user message"}
            }
        }
    }))
    .unwrap();

    assert!(verdict.can_proceed);
    let record = &verdict.extracted_arguments.required_arguments["destination"];
    assert_eq!(record.value, Some(json!("Berlin")));
    assert_eq!(record.metadata["source"], json!("user message"));
    assert_eq!(verdict.call_arguments()["destination"], json!("Berlin"));
}

#[test]
fn test_verdict_keeps_explicit_null_value() {
    let verdict: ExtractionVerdict = serde_json::from_value(json!({
        "can_proceed": true,
        "extracted_arguments": {
            "required_arguments": {
                "cc": {"value": null, "source": "user declined"},
                "subject": {"source": "not mentioned"}
            }
        }
    }))
    .unwrap();

    let records = &verdict.extracted_arguments.required_arguments;
    assert_eq!(records["cc"].value, Some(Value::Null));
    assert_eq!(records["subject"].value, None);

    let arguments = verdict.call_arguments();
    assert_eq!(arguments["cc"], Value::Null);
    assert_eq!(arguments["subject"], json!({}));
}

#[test]
fn test_verdict_missing_argument_shapes() {
    let as_list: ExtractionVerdict = serde_json::from_value(json!({
        "can_proceed": false,
        "missing_required_arguments": ["recipient", {"name": "subject"}]
    }))
    .unwrap();
    assert_eq!(as_list.missing_required_arguments, ["recipient", "subject"]);

    let as_object: ExtractionVerdict = serde_json::from_value(json!({
        "can_proceed": false,
        "missing_required_arguments": {"recipient": "email address"}
    }))
    .unwrap();
    assert_eq!(as_object.missing_required_arguments, ["recipient"]);
    assert_eq!(
        as_object.missing_prompt(),
        "Please input required arguments to continue: [recipient]"
    );
}

#[test]
fn test_verdict_requires_can_proceed() {
    let result = serde_json::from_value::<ExtractionVerdict>(json!({"arguments": {}}));
    assert!(result.is_err());
}

#[test]
fn test_value_less_record_becomes_empty_object() {
    let verdict: ExtractionVerdict = serde_json::from_value(json!({
        "can_proceed": true,
        "extracted_arguments": {"required_arguments": {"flags": {"note": "none given"}}}
    }))
    .unwrap();
    assert_eq!(verdict.call_arguments()["flags"], json!({}));
}

#[test]
fn test_step_outcome_wire_names() {
    let outcome = StepOutcome::need_input("email_api", "Please input recipient");
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["toolName"], json!("email_api"));
    assert_eq!(value["status"], json!("need_input"));

    assert_eq!(
        StepOutcome::failure("flight_api").result,
        json!("execution failed")
    );
}

#[test]
fn test_outcome_status_from_str() {
    assert_eq!("success".parse::<OutcomeStatus>(), Ok(OutcomeStatus::Success));
    assert_eq!("NEED_INPUT".parse::<OutcomeStatus>(), Ok(OutcomeStatus::NeedInput));
    assert!("maybe".parse::<OutcomeStatus>().is_err());
}

#[test]
fn test_replan_response_defaults_to_ok() {
    let response: ReplanResponse = serde_json::from_value(json!({
        "plan": [{"intent": "book flight", "tool": "flight_api", "data": {"method": "book"}}]
    }))
    .unwrap();
    assert_eq!(response.status, ReplanStatus::Ok);
    assert_eq!(response.plan.len(), 1);

    let failed: ReplanResponse =
        serde_json::from_value(json!({"status": "failed", "reason": "no tools"})).unwrap();
    assert_eq!(failed.status, ReplanStatus::Failed);
    assert!(failed.plan.is_empty());
}

#[test]
fn test_candidate_key_ignores_empty_id() {
    let empty = ToolCandidate {
        id: Some(String::new()),
        ..Default::default()
    };
    assert!(empty.key().is_none());
    assert!(ToolCandidate::default().key().is_none());
}
