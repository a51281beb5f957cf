//! Step outcomes and pass reports.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type-safe enumeration of step outcome statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Tool ran and its result verified
    Success,

    /// Tool ran but the result did not verify
    Failure,

    /// Required arguments are missing; the caller must supply them
    NeedInput,
}

impl FromStr for OutcomeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(OutcomeStatus::Success),
            "failure" => Ok(OutcomeStatus::Failure),
            "need_input" | "needinput" => Ok(OutcomeStatus::NeedInput),
            _ => Err(format!("Invalid outcome status: {s}")),
        }
    }
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::Failure => "failure",
            OutcomeStatus::NeedInput => "need_input",
        }
    }

    /// Get status with an icon for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "✓ Success",
            OutcomeStatus::Failure => "✗ Failure",
            OutcomeStatus::NeedInput => "? Needs input",
        }
    }
}

/// Result returned for one step execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepOutcome {
    #[serde(rename = "toolName")]
    pub tool_name: String,

    /// Tool output on success, a human-readable message otherwise
    pub result: Value,

    pub status: OutcomeStatus,
}

impl StepOutcome {
    pub fn success(tool_name: impl Into<String>, result: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            result,
            status: OutcomeStatus::Success,
        }
    }

    pub fn failure(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: Value::String("execution failed".to_string()),
            status: OutcomeStatus::Failure,
        }
    }

    pub fn need_input(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: Value::String(message.into()),
            status: OutcomeStatus::NeedInput,
        }
    }
}

/// How an execution pass ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PassStatus {
    /// Every step in the plan is executed
    Completed,

    /// A step failed; later steps were not attempted
    Failed { index: usize },

    /// A step needs input; it stays unexecuted and the pass can resume
    NeedInput { index: usize },
}

/// Summary of one execution pass over a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub status: PassStatus,

    /// Outcomes of the steps visited during this pass, in order
    pub outcomes: Vec<(usize, StepOutcome)>,

    /// Whether the plan was handed to plan-context memory
    pub persisted: bool,
}

impl PassReport {
    pub fn is_completed(&self) -> bool {
        self.status == PassStatus::Completed
    }

    /// The outcome that stopped the pass, if it halted early.
    pub fn halting_outcome(&self) -> Option<&StepOutcome> {
        match self.status {
            PassStatus::Completed => None,
            PassStatus::Failed { .. } | PassStatus::NeedInput { .. } => {
                self.outcomes.last().map(|(_, outcome)| outcome)
            }
        }
    }
}
