//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use super::{datetime::LocalDateTime, models::InlineValue};
use crate::{
    models::{PlanContext, StepCheckpoint},
    registry::ToolManifest,
};

/// Newtype wrapper for listing stored plan contexts, one line each.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use waypoint_core::{
///     display::PlanContexts,
///     models::{Plan, PlanContext},
/// };
///
/// let context = PlanContext {
///     id: 7,
///     user_id: "alice".to_string(),
///     intent: "book a flight".to_string(),
///     plan: Plan::new("book a flight", Vec::new()),
///     created_at: Timestamp::now(),
/// };
///
/// let output = PlanContexts(vec![context]).to_string();
/// assert!(output.contains("**7**"));
/// assert!(output.contains("book a flight"));
/// assert_eq!(PlanContexts(Vec::new()).to_string(), "No stored plans found.\n");
/// ```
pub struct PlanContexts(pub Vec<PlanContext>);

impl PlanContexts {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for PlanContexts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No stored plans found.");
        }
        for context in &self.0 {
            writeln!(
                f,
                "- **{}** {} ({}, {} steps, {})",
                context.id,
                context.intent,
                context.user_id,
                context.plan.steps.len(),
                LocalDateTime(&context.created_at)
            )?;
        }
        Ok(())
    }
}

/// Newtype wrapper for the tool listing.
pub struct Tools<'a>(pub Vec<&'a ToolManifest>);

impl fmt::Display for Tools<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tools registered.");
        }
        for tool in &self.0 {
            write!(f, "{tool}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a user's pending step checkpoints.
pub struct Checkpoints(pub Vec<StepCheckpoint>);

impl fmt::Display for Checkpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No pending checkpoints.");
        }
        for checkpoint in &self.0 {
            writeln!(
                f,
                "- Step {} ({}): {}",
                checkpoint.step_index + 1,
                LocalDateTime(&checkpoint.updated_at),
                InlineValue(&checkpoint.execution_result)
            )?;
        }
        Ok(())
    }
}
