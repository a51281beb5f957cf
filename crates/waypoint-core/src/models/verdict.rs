//! Argument extraction verdicts.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

/// Result of asking the model whether a step's arguments are available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionVerdict {
    pub can_proceed: bool,

    /// Names of required parameters the conversation does not supply
    #[serde(
        default,
        deserialize_with = "deserialize_names",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub missing_required_arguments: Vec<String>,

    #[serde(default)]
    pub extracted_arguments: ExtractedArguments,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExtractedArguments {
    #[serde(default)]
    pub required_arguments: BTreeMap<String, ArgumentRecord>,
}

/// One extracted argument: the literal value plus descriptive metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ArgumentRecord {
    /// `None` when the key is absent; an explicit `null` is `Some(Value::Null)`
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ExtractionVerdict {
    /// A verdict that lets the step proceed with the given values.
    pub fn proceed<I, K>(arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let required_arguments = arguments
            .into_iter()
            .map(|(name, value)| {
                (
                    name.into(),
                    ArgumentRecord {
                        value: Some(value),
                        metadata: Map::new(),
                    },
                )
            })
            .collect();
        Self {
            can_proceed: true,
            missing_required_arguments: Vec::new(),
            extracted_arguments: ExtractedArguments { required_arguments },
        }
    }

    /// A verdict that halts the step for missing input.
    pub fn missing<I, K>(names: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            can_proceed: false,
            missing_required_arguments: names.into_iter().map(Into::into).collect(),
            extracted_arguments: ExtractedArguments::default(),
        }
    }

    /// Concrete call arguments: each extracted value keyed by name. A record
    /// without a `value` key is passed as an empty object; an explicit `null`
    /// is passed through.
    pub fn call_arguments(&self) -> Map<String, Value> {
        self.extracted_arguments
            .required_arguments
            .iter()
            .map(|(name, record)| {
                (
                    name.clone(),
                    record.value.clone().unwrap_or_else(|| json!({})),
                )
            })
            .collect()
    }

    /// Human-readable prompt naming the missing arguments.
    pub fn missing_prompt(&self) -> String {
        format!(
            "Please input required arguments to continue: [{}]",
            self.missing_required_arguments.join(", ")
        )
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Models list missing arguments as plain names, as `{name: ...}` records, or
/// as an object keyed by name.
fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(name)) => vec![name],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                Value::Object(record) => record
                    .get("name")
                    .and_then(Value::as_str)
                    .map(String::from),
                _ => None,
            })
            .collect(),
        Some(Value::Object(record)) => record.into_iter().map(|(name, _)| name).collect(),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "unexpected missing_required_arguments: {other}"
            )));
        }
    };
    Ok(names)
}
