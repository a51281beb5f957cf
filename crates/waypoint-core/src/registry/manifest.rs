//! Tool manifest files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    models::{InputDescriptor, ToolSchema, step::deserialize_inputs},
};

/// Default time a tool process may run before it is killed.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A tool described by a `*.json` manifest.
///
/// ```json
/// {
///   "name": "weather_api",
///   "description": "Current weather by city",
///   "command": "python3",
///   "args": ["weather.py"],
///   "methods": [
///     { "name": "current", "description": "...", "inputs": ["city"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolManifest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Executable to spawn; resolved through `PATH` or relative to `dir`
    pub command: String,

    /// Arguments placed before the method name
    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub methods: Vec<MethodManifest>,

    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Directory the manifest was loaded from; the process runs there
    #[serde(skip)]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodManifest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "deserialize_inputs")]
    pub inputs: Vec<InputDescriptor>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ToolManifest {
    /// Reads and validates a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the file cannot be read,
    /// `EngineError::Serialization` if it is not a manifest, and
    /// `EngineError::InvalidInput` if required fields are empty.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut manifest: ToolManifest = serde_json::from_str(&text)?;
        manifest.validate()?;
        manifest.dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid_input("name").with_reason("must not be empty"));
        }
        if self.command.trim().is_empty() {
            return Err(EngineError::invalid_input("command")
                .with_reason(format!("tool '{}' has no command", self.name)));
        }
        if let Some(method) = self.methods.iter().find(|m| m.name.trim().is_empty()) {
            return Err(EngineError::invalid_input("methods").with_reason(format!(
                "tool '{}' declares a method without a name ({})",
                self.name, method.description
            )));
        }
        Ok(())
    }

    pub fn method(&self, name: &str) -> Option<&MethodManifest> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// The schema a planner binds to a step for `method`.
    pub fn schema(&self, method: &str) -> Option<ToolSchema> {
        self.method(method).map(|m| ToolSchema {
            method: m.name.clone(),
            description: (!m.description.is_empty()).then(|| m.description.clone()),
            inputs: m.inputs.clone(),
        })
    }
}
