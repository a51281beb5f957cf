//! Data models for plans, steps, and the values that flow through a pass.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping data structures apart from
//! presentation.
//!
//! # Lifecycle
//!
//! Steps are created by the initial planner as drafts (intent and
//! description only), bound to a tool and schema by re-planning, and mutated
//! in place by the engine while a pass runs (`executed`,
//! `tool_executed_result`, folded input metadata). A plan whose steps are all
//! executed is handed to plan-context memory and is not touched afterwards.
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::models::{Plan, Step};
//!
//! let step: Step = serde_json::from_value(serde_json::json!({
//!     "intent": "book flight",
//!     "description": "Book a flight to Berlin",
//!     "tool": "flight_api",
//!     "data": "{\"method\": \"book\", \"inputs\": [\"destination\"]}"
//! }))
//! .unwrap();
//!
//! let schema = step.data.as_ref().unwrap();
//! assert_eq!(schema.method, "book");
//! assert_eq!(schema.inputs[0].name, "destination");
//!
//! let plan = Plan::new("book a flight", vec![step]);
//! assert!(!plan.is_fully_executed());
//! ```

pub mod context;
pub mod message;
pub mod outcome;
pub mod plan;
pub mod replan;
pub mod step;
pub mod tool;
pub mod verdict;

#[cfg(test)]
mod tests;

pub use context::{PlanContext, StepCheckpoint};
pub use message::{ChatMessage, Role};
pub use outcome::{OutcomeStatus, PassReport, PassStatus, StepOutcome};
pub use plan::Plan;
pub use replan::{ReplanResponse, ReplanStatus};
pub use step::{InputDescriptor, Step, ToolSchema};
pub use tool::{MemoryMatches, ToolCallResult, ToolCandidate, ToolConfig};
pub use verdict::{ArgumentRecord, ExtractedArguments, ExtractionVerdict};
