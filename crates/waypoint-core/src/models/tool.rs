//! Tool candidates and the per-call tool configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{InputDescriptor, Step};
use crate::error::{EngineError, Result};

/// A tool match returned by step memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolCandidate {
    /// Identifier used to deduplicate candidates across a plan
    #[serde(default)]
    pub id: Option<String>,

    /// Similarity score reported by the memory backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// Descriptive payload (tool, method, description, inputs)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ToolCandidate {
    /// The identifier, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Raw match list returned by a memory lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MemoryMatches {
    #[serde(default)]
    pub matches: Vec<ToolCandidate>,
}

/// Ephemeral view combining a step's schema with its resolved tool name.
/// Only lives for the duration of one step execution.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolConfig {
    pub tool: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub inputs: Vec<InputDescriptor>,
}

impl ToolConfig {
    /// Builds the config for the step at `index`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnboundStep` when re-planning left the step
    /// without a tool or without a schema.
    pub fn from_step(step: &Step, index: usize) -> Result<Self> {
        let tool = step
            .tool
            .clone()
            .filter(|tool| !tool.is_empty())
            .ok_or_else(|| EngineError::UnboundStep {
                index,
                reason: "no tool assigned".to_string(),
            })?;
        let schema = step.data.as_ref().ok_or_else(|| EngineError::UnboundStep {
            index,
            reason: format!("tool '{tool}' has no input schema"),
        })?;

        Ok(Self {
            tool,
            method: schema.method.clone(),
            description: schema.description.clone(),
            inputs: schema.inputs.clone(),
        })
    }
}

/// What a tool call handed back before verification.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub output: Value,
    /// Side-channel information (stderr, timing, ...) that is only logged
    pub auxiliary: Option<Value>,
}

impl ToolCallResult {
    pub fn new(output: Value) -> Self {
        Self {
            output,
            auxiliary: None,
        }
    }
}
