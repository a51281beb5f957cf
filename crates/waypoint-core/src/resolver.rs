//! Candidate tool lookup for plan steps.

use std::{collections::HashSet, sync::Arc};

use log::debug;

use crate::{
    error::Result,
    models::{Step, ToolCandidate},
    services::StepMemory,
};

/// Looks up candidate tools for steps through step memory.
#[derive(Clone)]
pub struct ToolResolver {
    memory: Arc<dyn StepMemory>,
}

impl ToolResolver {
    pub fn new(memory: Arc<dyn StepMemory>) -> Self {
        Self { memory }
    }

    /// Returns the raw match list for a step, unfiltered. A memory with
    /// nothing to say yields an empty list.
    pub async fn resolve(&self, step: &Step) -> Result<Vec<ToolCandidate>> {
        let matches = self.memory.retrieve(step.lookup_text()).await?;
        let candidates = matches.map(|m| m.matches).unwrap_or_default();
        debug!(
            "resolved {} candidate(s) for step '{}'",
            candidates.len(),
            step.intent
        );
        Ok(candidates)
    }
}

/// Keeps one candidate per identifier, in first-seen order. Candidates
/// without an identifier are dropped.
pub fn aggregate_and_dedupe<I>(candidates: I) -> Vec<ToolCandidate>
where
    I: IntoIterator<Item = ToolCandidate>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate
                .key()
                .is_some_and(|key| seen.insert(key.to_string()))
        })
        .collect()
}
