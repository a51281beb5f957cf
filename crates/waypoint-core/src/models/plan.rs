//! Plan model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::Step;

/// An ordered sequence of steps produced to satisfy one user intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Plan {
    /// The user intent this plan answers
    pub intent: String,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(intent: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            intent: intent.into(),
            steps,
        }
    }

    /// True when every step reached a terminal state. An empty plan is
    /// trivially satisfied.
    pub fn is_fully_executed(&self) -> bool {
        self.steps.iter().all(|step| step.executed)
    }

    /// Index of the first step still waiting to run.
    pub fn next_pending(&self) -> Option<usize> {
        self.steps.iter().position(|step| !step.executed)
    }

    /// Number of steps marked executed.
    pub fn executed_count(&self) -> usize {
        self.steps.iter().filter(|step| step.executed).count()
    }

    /// Clears the execution state of every step.
    pub fn reset(&mut self) {
        self.steps.iter_mut().for_each(Step::reset);
    }
}
