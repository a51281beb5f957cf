//! Parameter structures for waypoint operations.
//!
//! These structs carry no interface-specific derives. The CLI wraps them in
//! its own `clap` argument structs and converts with `From`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde only)    │
//! └─────────────────┘    └─────────────────┘
//! ```
//!
//! To add an operation, define its parameters here, add a wrapper in
//! `waypoint-cli/src/cli.rs`, and make the core method take the core type.

use serde::{Deserialize, Serialize};

/// Generic parameters for operations requiring just an ID.
///
/// Used for showing and deleting stored plan contexts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for running an intent through the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunIntent {
    /// Free-text user intent
    pub intent: String,
    /// User the run acts for; plan contexts and checkpoints are keyed by it
    pub user_id: String,
    /// Re-execute the most recent stored plan for this intent before
    /// planning from scratch
    #[serde(default)]
    pub reuse: bool,
}

/// Parameters for listing stored plan contexts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListContexts {
    /// Only list contexts stored for this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
