//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can render it through its terminal
//! renderer or print it as is.

use std::fmt;

use serde_json::Value;

use super::datetime::LocalDateTime;
use crate::{
    models::{OutcomeStatus, PassReport, PassStatus, Plan, PlanContext, Step, StepOutcome},
    registry::ToolManifest,
};

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strings are shown as they are, everything else as compact JSON.
pub(crate) struct InlineValue<'a>(pub &'a Value);

impl fmt::Display for InlineValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(text) => write!(f, "{text}"),
            other => write!(f, "`{other}`"),
        }
    }
}

impl Step {
    fn fmt_numbered(&self, number: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.executed { "✓ executed" } else { "○ pending" };
        writeln!(f, "### {number}. {} ({state})", self.intent)?;
        writeln!(f)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        match (&self.tool, &self.data) {
            (Some(tool), Some(schema)) => {
                writeln!(f, "- Tool: `{tool}.{}`", schema.method)?;
                if !schema.inputs.is_empty() {
                    let names: Vec<&str> = schema.inputs.iter().map(|i| i.name.as_str()).collect();
                    writeln!(f, "- Inputs: {}", names.join(", "))?;
                }
            }
            (Some(tool), None) => writeln!(f, "- Tool: `{tool}`")?,
            _ => writeln!(f, "- Tool: unresolved")?,
        }
        if let Some(result) = &self.tool_executed_result {
            writeln!(f, "- Result: {}", InlineValue(result))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_numbered(1, f)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.intent)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Progress: {}/{} steps executed",
            self.executed_count(),
            self.steps.len()
        )?;

        if self.steps.is_empty() {
            return writeln!(f, "\nNo steps in this plan.");
        }
        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for (index, step) in self.steps.iter().enumerate() {
            step.fmt_numbered(index + 1, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} `{}`: {}",
            self.status.with_icon(),
            self.tool_name,
            InlineValue(&self.result)
        )
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            PassStatus::Completed => writeln!(f, "## Completed")?,
            PassStatus::Failed { index } => writeln!(f, "## Failed at step {}", index + 1)?,
            PassStatus::NeedInput { index } => {
                writeln!(f, "## Waiting for input at step {}", index + 1)?
            }
        }
        writeln!(f)?;

        if self.outcomes.is_empty() {
            writeln!(f, "No steps were run in this pass.")?;
        }
        for (index, outcome) in &self.outcomes {
            write!(f, "{}. {outcome}", index + 1)?;
        }
        if self.persisted {
            writeln!(f)?;
            writeln!(f, "Plan stored for reuse.")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plan context {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "- User: {}", self.user_id)?;
        writeln!(f, "- Stored: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

impl fmt::Display for ToolManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.name)?;
        writeln!(f)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }
        for method in &self.methods {
            let inputs: Vec<String> = method
                .inputs
                .iter()
                .map(|input| {
                    if input.is_required() {
                        input.name.clone()
                    } else {
                        format!("{}?", input.name)
                    }
                })
                .collect();
            write!(f, "- `{}({})`", method.name, inputs.join(", "))?;
            if method.description.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, ": {}", method.description)?;
            }
        }
        writeln!(f)
    }
}
