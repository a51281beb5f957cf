//! Memory backends: plan contexts in SQLite and tool lookup by similarity.

pub mod plan_context;
pub mod step_memory;
pub mod vector;

pub use plan_context::{PlanContextMemory, PlanContextMemoryBuilder};
pub use step_memory::{DEFAULT_MATCH_THRESHOLD, RegistryStepMemory};
pub use vector::{VectorIndex, cosine_similarity, embed_text};
