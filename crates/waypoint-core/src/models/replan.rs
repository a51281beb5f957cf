//! Replies from the tool-aware planner.

use serde::{Deserialize, Serialize};

use super::Step;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplanStatus {
    #[default]
    Ok,
    Failed,
}

/// A revised plan bound to concrete tools, or the planner's refusal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReplanResponse {
    #[serde(default)]
    pub status: ReplanStatus,

    #[serde(default)]
    pub plan: Vec<Step>,

    /// Why the planner gave up, when it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReplanResponse {
    pub fn ok(plan: Vec<Step>) -> Self {
        Self {
            status: ReplanStatus::Ok,
            plan,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: ReplanStatus::Failed,
            plan: Vec::new(),
            reason: Some(reason.into()),
        }
    }
}
