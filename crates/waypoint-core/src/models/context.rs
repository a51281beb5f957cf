//! Persisted plan contexts and per-step checkpoints.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Plan;

/// A fully executed plan remembered for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanContext {
    pub id: u64,

    /// User the plan belongs to
    pub user_id: String,

    /// Intent the plan satisfied
    pub intent: String,

    /// The final, mutated plan
    pub plan: Plan,

    /// Timestamp when the plan was stored (UTC)
    pub created_at: Timestamp,
}

/// Incremental record of a successful step within an unfinished pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepCheckpoint {
    pub user_key: String,
    pub step_index: usize,
    pub execution_result: Value,
    pub executed: bool,
    pub updated_at: Timestamp,
}
