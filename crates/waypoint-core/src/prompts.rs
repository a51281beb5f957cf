//! Prompt templates sent to the language model.

use serde_json::Value;

use crate::models::{ChatMessage, Plan, Role, Step, ToolCandidate, ToolConfig};

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn transcript(history: &[ChatMessage]) -> String {
    if history.is_empty() {
        return "(no conversation yet)".to_string();
    }
    history
        .iter()
        .map(|message| {
            let role = match message.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            format!("{role}: {}", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asks the model which arguments of `config` the conversation supplies.
pub fn argument_extraction(
    config: &ToolConfig,
    history: &[ChatMessage],
    plan: &Plan,
    step: &Step,
) -> String {
    format!(
        r#"You are preparing a tool call for one step of a larger plan.

## Overall intent
{intent}

## Plan
{plan}

## Current step
{step}

## Tool
{config}

## Conversation
{conversation}

Decide, using only the conversation and the results of earlier steps, whether
every required input of the tool can be filled. Do not invent values.

Reply with a single JSON object and nothing else:
{{
  "can_proceed": true | false,
  "missing_required_arguments": ["<name>", ...],
  "extracted_arguments": {{
    "required_arguments": {{
      "<name>": {{"value": <value>, "description": "<what it is>", "source": "<where it came from>"}}
    }}
  }}
}}
List missing_required_arguments only when can_proceed is false."#,
        intent = plan.intent,
        plan = pretty(&plan.steps),
        step = pretty(step),
        config = pretty(config),
        conversation = transcript(history),
    )
}

/// Asks the model to classify a tool result.
pub fn result_verification(config: &ToolConfig, result: &Value) -> String {
    format!(
        r#"A tool was called and returned a result.

## Tool
{config}

## Result
{result}

Did the call accomplish what the method is for? Answer with exactly one word:
success or failure."#,
        config = pretty(config),
        result = pretty(result),
    )
}

/// Asks the model to break an intent into draft steps.
pub fn execution_plan(intent: &str) -> String {
    format!(
        r#"Break the following request into the smallest ordered list of steps,
each of which a single tool call could perform.

Request: {intent}

Reply with JSON only:
{{"steps": [{{"intent": "<short goal>", "description": "<one sentence describing the work>"}}]}}"#
    )
}

/// Asks the model to bind the intent's steps to tools from the pool.
pub fn tool_based_plan(intent: &str, tool_pool: &[ToolCandidate]) -> String {
    format!(
        r#"Plan the request below using only the available tools.

Request: {intent}

## Available tools
{tools}

Each step must name a tool and copy that tool method's schema into "data".
If the request cannot be done with these tools, answer with status "failed"
and a short reason.

Reply with JSON only:
{{
  "status": "ok" | "failed",
  "reason": "<only when failed>",
  "plan": [
    {{
      "intent": "<short goal>",
      "description": "<one sentence>",
      "tool": "<tool name>",
      "data": {{"method": "<method>", "inputs": [{{"name": "<input>", "type": "<type>", "required": true}}]}}
    }}
  ]
}}"#,
        tools = pretty(&tool_pool),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputDescriptor;

    #[test]
    fn test_extraction_prompt_mentions_inputs_and_history() {
        let config = ToolConfig {
            tool: "email_api".to_string(),
            method: "send".to_string(),
            description: None,
            inputs: vec![InputDescriptor::named("recipient")],
        };
        let plan = Plan::new("send confirmation", vec![Step::draft("send email", "")]);
        let history = vec![ChatMessage::user("mail it to ops@example.com")];

        let prompt = argument_extraction(&config, &history, &plan, &plan.steps[0]);
        assert!(prompt.contains("recipient"));
        assert!(prompt.contains("user: mail it to ops@example.com"));
        assert!(prompt.contains("send confirmation"));
        assert!(prompt.contains("\"can_proceed\""));
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(transcript(&[]), "(no conversation yet)");
    }
}
