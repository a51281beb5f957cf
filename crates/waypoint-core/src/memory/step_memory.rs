//! Step memory over the tool registry.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{Map, json};

use super::vector::{DEFAULT_TOP_K, VectorIndex, embed_text};
use crate::{
    error::Result,
    models::MemoryMatches,
    registry::ToolRegistry,
    services::StepMemory,
};

/// Namespace holding one vector per registry method.
pub const TOOL_NAMESPACE: &str = "tools";

/// Minimum similarity for a method to count as a candidate.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.1;

/// Finds candidate tools for a step description by text similarity.
///
/// Candidate ids are `tool.method`; metadata carries `tool`, `method`,
/// `description` and `inputs` so the tool planner can bind a step directly.
#[derive(Debug)]
pub struct RegistryStepMemory {
    index: VectorIndex,
    threshold: f32,
    top_k: usize,
}

impl RegistryStepMemory {
    pub fn new(registry: &ToolRegistry) -> Self {
        let mut index = VectorIndex::new();
        for tool in registry.iter() {
            for method in &tool.methods {
                let inputs: Vec<&str> = method.inputs.iter().map(|i| i.name.as_str()).collect();
                let text = format!(
                    "{} {} {} {} {}",
                    tool.name,
                    tool.description,
                    method.name,
                    method.description,
                    inputs.join(" ")
                );

                let mut metadata = Map::new();
                metadata.insert("tool".to_string(), json!(tool.name));
                metadata.insert("method".to_string(), json!(method.name));
                metadata.insert("description".to_string(), json!(method.description));
                metadata.insert("inputs".to_string(), json!(method.inputs));

                let id = format!("{}.{}", tool.name, method.name);
                let saved = index.save(id.as_str(), embed_text(&text), metadata, TOOL_NAMESPACE);
                if let Err(e) = saved {
                    warn!("Skipping {id}: {e}");
                }
            }
        }
        debug!("indexed {} tool method(s)", index.len(TOOL_NAMESPACE));

        Self {
            index,
            threshold: DEFAULT_MATCH_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[async_trait]
impl StepMemory for RegistryStepMemory {
    async fn retrieve(&self, description: &str) -> Result<Option<MemoryMatches>> {
        let matches: Vec<_> = self
            .index
            .retrieve(&embed_text(description), TOOL_NAMESPACE, self.top_k)
            .into_iter()
            .filter(|candidate| candidate.score.is_some_and(|s| s >= self.threshold))
            .collect();

        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(MemoryMatches { matches }))
    }
}
