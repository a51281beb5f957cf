//! Display for run results and management operations.

use std::fmt;

use crate::engine::IntentRun;

impl fmt::Display for IntentRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentRun::ReplanFailed(response) => {
                writeln!(f, "## Could not plan with the available tools")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "{}",
                    response.reason.as_deref().unwrap_or("No reason was given.")
                )
            }
            IntentRun::Executed { plan, report } => {
                write!(f, "{plan}")?;
                write!(f, "{report}")
            }
        }
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult {
    pub resource: &'static str,
    pub id: u64,
}

impl DeleteResult {
    pub fn new(resource: &'static str, id: u64) -> Self {
        Self { resource, id }
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deleted {} with ID: {}", self.resource, self.id)
    }
}
