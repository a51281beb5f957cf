//! In-process vector index with namespaces.
//!
//! Each namespace owns an HNSW graph (`hnsw_rs`). The graph cannot remove
//! points, so replaced and deleted entries keep their point and are tracked
//! as stale; searches over-fetch by the stale count and filter them out.
//! Scores are recomputed exactly from the stored vectors.

use std::{
    collections::{HashMap, HashSet, hash_map::DefaultHasher},
    fmt,
    hash::{Hash, Hasher},
};

use hnsw_rs::prelude::*;
use jiff::Timestamp;
use serde_json::{Map, Value};

use crate::{
    error::{EngineError, Result},
    models::ToolCandidate,
};

/// Dimension of vectors produced by [`embed_text`].
pub const EMBEDDING_DIMENSION: usize = 256;

/// Default number of matches returned by a query.
pub const DEFAULT_TOP_K: usize = 10;

const MAX_NB_CONNECTION: usize = 16;
const MAX_LAYER: usize = 16;
const EF_CONSTRUCTION: usize = 200;
const EF_SEARCH: usize = 64;
const INITIAL_CAPACITY: usize = 10_000;

struct Entry {
    /// Graph point; `None` for zero-length vectors, which match nothing
    point: Option<usize>,
    vector: Vec<f32>,
    metadata: Map<String, Value>,
}

struct Namespace {
    graph: Hnsw<'static, f32, DistCosine>,
    dimension: usize,
    /// Entry id for every graph point, indexed by point id
    points: Vec<String>,
    entries: HashMap<String, Entry>,
    stale: HashSet<usize>,
}

impl Namespace {
    fn new(dimension: usize) -> Self {
        Self {
            graph: Hnsw::new(
                MAX_NB_CONNECTION,
                INITIAL_CAPACITY,
                MAX_LAYER,
                EF_CONSTRUCTION,
                DistCosine,
            ),
            dimension,
            points: Vec::new(),
            entries: HashMap::new(),
            stale: HashSet::new(),
        }
    }

    fn retire(&mut self, entry: &Entry) {
        if let Some(point) = entry.point {
            self.stale.insert(point);
        }
    }
}

/// Vectors with metadata, grouped by namespace and keyed by id.
#[derive(Default)]
pub struct VectorIndex {
    namespaces: HashMap<String, Namespace>,
}

impl fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, namespace) in &self.namespaces {
            map.entry(name, &namespace.entries.len());
        }
        map.finish()
    }
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts a vector. A `timestamp` (Unix milliseconds) is stamped into
    /// the metadata.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the vector's dimension differs
    /// from the namespace's, which is fixed by its first vector.
    pub fn save(
        &mut self,
        id: impl Into<String>,
        vector: Vec<f32>,
        mut metadata: Map<String, Value>,
        namespace: &str,
    ) -> Result<()> {
        let id = id.into();
        let space = self
            .namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| Namespace::new(vector.len()));
        if vector.len() != space.dimension {
            return Err(EngineError::invalid_input("vector").with_reason(format!(
                "dimension {} does not match namespace '{namespace}' ({})",
                vector.len(),
                space.dimension
            )));
        }

        metadata.insert(
            "timestamp".to_string(),
            Value::from(Timestamp::now().as_millisecond()),
        );

        let point = (norm(&vector) > 0.0).then(|| {
            let point = space.points.len();
            space.graph.insert_slice((&vector, point));
            space.points.push(id.clone());
            point
        });
        let entry = Entry {
            point,
            vector,
            metadata,
        };
        if let Some(previous) = space.entries.insert(id, entry) {
            space.retire(&previous);
        }
        Ok(())
    }

    /// Best `top_k` matches for `vector` in `namespace`, highest score first.
    pub fn retrieve(&self, vector: &[f32], namespace: &str, top_k: usize) -> Vec<ToolCandidate> {
        let Some(space) = self.namespaces.get(namespace) else {
            return Vec::new();
        };
        if top_k == 0 || vector.len() != space.dimension || norm(vector) == 0.0 {
            return Vec::new();
        }

        let request = top_k + space.stale.len();
        let neighbours = space
            .graph
            .search(vector, request, EF_SEARCH.max(request * 2));

        let mut scored: Vec<_> = neighbours
            .into_iter()
            .filter(|neighbour| !space.stale.contains(&neighbour.d_id))
            .filter_map(|neighbour| {
                let id = space.points.get(neighbour.d_id)?;
                let entry = space.entries.get(id)?;
                Some((cosine_similarity(vector, &entry.vector), id, entry))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        scored
            .into_iter()
            .take(top_k)
            .map(|(score, id, entry)| ToolCandidate {
                id: Some(id.clone()),
                score: Some(score),
                metadata: entry.metadata.clone(),
            })
            .collect()
    }

    /// Removes a vector; returns whether it existed.
    pub fn delete(&mut self, id: &str, namespace: &str) -> bool {
        let Some(space) = self.namespaces.get_mut(namespace) else {
            return false;
        };
        match space.entries.remove(id) {
            Some(entry) => {
                space.retire(&entry);
                true
            }
            None => false,
        }
    }

    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .get(namespace)
            .map_or(0, |space| space.entries.len())
    }
}

fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in `[-1, 1]`; zero when either vector has no length or
/// the dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Hashed bag-of-words embedding, normalized to unit length.
///
/// Words are lowercased alphanumeric runs of two or more characters.
pub fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; EMBEDDING_DIMENSION];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() > 1)
    {
        let mut hasher = DefaultHasher::new();
        word.to_lowercase().hash(&mut hasher);
        vector[(hasher.finish() % EMBEDDING_DIMENSION as u64) as usize] += 1.0;
    }

    let length = norm(&vector);
    if length > 0.0 {
        vector.iter_mut().for_each(|x| *x /= length);
    }
    vector
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn metadata(tool: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("tool".to_string(), json!(tool));
        map
    }

    #[test]
    fn test_similar_text_scores_higher() {
        let flight = embed_text("book a flight to Berlin");
        let weather = embed_text("current weather for a city");
        let query = embed_text("Flight booking to berlin");

        assert!(cosine_similarity(&query, &flight) > cosine_similarity(&query, &weather));
        assert!((cosine_similarity(&flight, &flight) - 1.0).abs() < 1e-5);
        assert_eq!(cosine_similarity(&embed_text(""), &flight), 0.0);
    }

    #[test]
    fn test_retrieve_orders_and_limits() {
        let mut index = VectorIndex::new();
        index
            .save("flight.book", embed_text("book flight"), metadata("flight"), "tools")
            .unwrap();
        index
            .save("weather.now", embed_text("weather now"), metadata("weather"), "tools")
            .unwrap();
        index
            .save("other", embed_text("book flight"), Map::new(), "elsewhere")
            .unwrap();

        let matches = index.retrieve(&embed_text("book a flight"), "tools", 1);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id.as_deref(), Some("flight.book"));
        assert_eq!(matches[0].metadata["tool"], json!("flight"));
        assert!(matches[0].metadata["timestamp"].as_i64().unwrap() > 0);
        assert!(index.retrieve(&embed_text("x"), "missing", 10).is_empty());
    }

    #[test]
    fn test_save_upserts_and_delete_removes() {
        let mut index = VectorIndex::new();
        index.save("a", embed_text("one"), Map::new(), "ns").unwrap();
        index.save("a", embed_text("two"), Map::new(), "ns").unwrap();
        assert_eq!(index.len("ns"), 1);

        assert!(index.delete("a", "ns"));
        assert!(!index.delete("a", "ns"));
        assert_eq!(index.len("ns"), 0);
    }

    #[test]
    fn test_replaced_and_deleted_points_are_not_returned() {
        let mut index = VectorIndex::new();
        index
            .save("email.send", embed_text("send email"), metadata("old"), "tools")
            .unwrap();
        index
            .save("email.send", embed_text("send email now"), metadata("new"), "tools")
            .unwrap();
        index
            .save("sms.send", embed_text("send sms"), metadata("sms"), "tools")
            .unwrap();

        let matches = index.retrieve(&embed_text("send email"), "tools", 10);
        let ids: Vec<_> = matches.iter().filter_map(|m| m.id.as_deref()).collect();
        assert_eq!(ids, vec!["email.send", "sms.send"]);
        assert_eq!(matches[0].metadata["tool"], json!("new"));

        index.delete("email.send", "tools");
        let matches = index.retrieve(&embed_text("send email"), "tools", 10);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id.as_deref(), Some("sms.send"));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let mut index = VectorIndex::new();
        index.save("a", vec![1.0, 0.0], Map::new(), "ns").unwrap();

        let err = index.save("b", vec![1.0, 0.0, 0.0], Map::new(), "ns");
        assert!(matches!(err, Err(EngineError::InvalidInput { .. })));
        assert!(index.retrieve(&[1.0, 0.0, 0.0], "ns", 5).is_empty());
        assert_eq!(index.retrieve(&[1.0, 0.0], "ns", 5).len(), 1);
    }

    #[test]
    fn test_zero_vector_is_stored_but_never_matches() {
        let mut index = VectorIndex::new();
        index.save("empty", embed_text(""), Map::new(), "ns").unwrap();

        assert_eq!(index.len("ns"), 1);
        assert!(index.retrieve(&embed_text("anything here"), "ns", 5).is_empty());
    }
}
