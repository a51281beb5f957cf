//! Tools discovered from manifest files.
//!
//! A tools directory holds one `*.json` manifest per tool. The registry is
//! loaded once at startup and shared by the process caller and the step
//! memory index.

use std::{collections::BTreeMap, path::Path};

use log::{debug, warn};

use crate::error::{EngineError, Result};

pub mod caller;
pub mod manifest;


pub use caller::ProcessToolCaller;
pub use manifest::{MethodManifest, ToolManifest};

/// Tools by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolManifest>,
}

impl ToolRegistry {
    /// Builds a registry from already loaded manifests. Later duplicates are
    /// ignored.
    pub fn from_manifests(manifests: impl IntoIterator<Item = ToolManifest>) -> Self {
        let mut registry = Self::default();
        for manifest in manifests {
            registry.insert(manifest);
        }
        registry
    }

    /// Loads every `*.json` manifest in `dir`, in file name order.
    ///
    /// Manifests that fail to load are skipped with a warning; a tool name
    /// that was already seen keeps its first manifest.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the directory cannot be read.
    pub fn scan_directory(dir: &Path) -> Result<Self> {
        let to_fs_error = |e| EngineError::FileSystem {
            path: dir.to_path_buf(),
            source: e,
        };

        let mut paths = std::fs::read_dir(dir)
            .map_err(to_fs_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(to_fs_error)?;
        paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"));
        paths.sort();

        let mut registry = Self::default();
        for path in paths {
            match ToolManifest::load(&path) {
                Ok(manifest) => registry.insert(manifest),
                Err(e) => warn!("skipping tool manifest {}: {e}", path.display()),
            }
        }
        debug!("loaded {} tool(s) from {}", registry.len(), dir.display());
        Ok(registry)
    }

    fn insert(&mut self, manifest: ToolManifest) {
        if self.tools.contains_key(&manifest.name) {
            warn!("duplicate tool '{}' ignored", manifest.name);
            return;
        }
        self.tools.insert(manifest.name.clone(), manifest);
    }

    pub fn get(&self, name: &str) -> Option<&ToolManifest> {
        self.tools.get(name)
    }

    /// Manifests in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolManifest> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
