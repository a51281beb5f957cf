//! Step model definition and the typed tool schema it carries.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::json::extract_json_from_str;

/// Represents one unit of intended tool work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Step {
    /// Free-text goal of the step as produced by the initial planner
    #[serde(default)]
    pub intent: String,

    /// Longer description used for tool lookup
    #[serde(default)]
    pub description: String,

    /// Identifier of the resolved tool (set by re-planning)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    /// Schema of the resolved tool method, parsed once on the way in
    #[serde(
        default,
        deserialize_with = "deserialize_schema",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<ToolSchema>,

    /// True once the step reached a terminal state in the current pass
    #[serde(default)]
    pub executed: bool,

    /// Last result produced for this step (payload or failure marker)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_executed_result: Option<Value>,
}

impl Step {
    /// Creates an unresolved draft step, as the initial planner produces.
    pub fn draft(intent: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Text used to query step memory for candidate tools.
    pub fn lookup_text(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.intent
        } else {
            &self.description
        }
    }

    /// Clears execution state so the step can run in a fresh pass.
    pub fn reset(&mut self) {
        self.executed = false;
        self.tool_executed_result = None;
    }
}

/// Schema of a tool method as bound to a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolSchema {
    /// Method to call on the resolved tool
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared parameters, in order
    #[serde(default, deserialize_with = "deserialize_inputs")]
    pub inputs: Vec<InputDescriptor>,
}

/// A single declared parameter and whatever metadata is known about it.
///
/// After a successful step the extracted argument metadata (without the
/// literal value) is merged into `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InputDescriptor {
    pub name: String,

    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl InputDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Map::new(),
        }
    }

    /// Whether the schema marks this input as required (default: true).
    pub fn is_required(&self) -> bool {
        self.metadata
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    Name(String),
    Descriptor(InputDescriptor),
}

pub(crate) fn deserialize_inputs<'de, D>(
    deserializer: D,
) -> Result<Vec<InputDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawInput>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|input| match input {
            RawInput::Name(name) => InputDescriptor::named(name),
            RawInput::Descriptor(descriptor) => descriptor,
        })
        .collect())
}

/// Planners hand the schema over either as an object or as a JSON-encoded
/// string; both end up as a validated `ToolSchema`.
fn deserialize_schema<'de, D>(deserializer: D) -> Result<Option<ToolSchema>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => {
            let value = extract_json_from_str(&text).ok_or_else(|| {
                D::Error::custom(format!("step data is not a JSON object: {text}"))
            })?;
            serde_json::from_value(value).map(Some).map_err(D::Error::custom)
        }
        Some(value) => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
    }
}
