//! Runtime settings read from the environment.

use std::{path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    context::DEFAULT_QUALITY_MODEL,
    error::{EngineError, Result},
    llm::DEFAULT_API_BASE,
    memory::DEFAULT_MATCH_THRESHOLD,
};

/// Model used for planning when `CHAT_MODEL_NAME` is unset.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// How a halted `need_input` pass is handled by a front end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Prompt on the terminal for the missing input and resume
    #[default]
    Terminal,
    /// Report the halt and stop
    Batch,
}

impl FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terminal" => Ok(InteractionMode::Terminal),
            "batch" => Ok(InteractionMode::Batch),
            _ => Err(format!("Invalid interaction mode: {s}")),
        }
    }
}

/// Which `ResultVerifier` a front end wires into the context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerifierKind {
    /// Classify results by their `status`/`error` fields
    #[default]
    Status,
    /// Ask the quality model whether the result accomplished the method
    Model,
}

impl FromStr for VerifierKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "status" => Ok(VerifierKind::Status),
            "model" => Ok(VerifierKind::Model),
            _ => Err(format!("Invalid verifier: {s}")),
        }
    }
}

/// Settings for building an application context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// `QUALITY_MODEL_NAME`: model for argument extraction
    pub quality_model: String,
    /// `CHAT_MODEL_NAME`: model for planning
    pub chat_model: String,
    /// `INTERACTION_MODE`: `terminal` or `batch`
    pub interaction_mode: InteractionMode,
    /// `WAYPOINT_API_BASE`: OpenAI-compatible endpoint base URL
    pub api_base: String,
    /// `WAYPOINT_API_KEY`
    #[serde(skip)]
    pub api_key: Option<String>,
    /// `WAYPOINT_TOOLS_DIR`: directory of tool manifests
    pub tools_dir: Option<PathBuf>,
    /// `WAYPOINT_DATABASE`: plan context database file
    pub database: Option<PathBuf>,
    /// `WAYPOINT_MATCH_THRESHOLD`: minimum similarity for tool candidates
    pub match_threshold: f32,
    /// `WAYPOINT_VERIFIER`: `status` or `model`
    pub verifier: VerifierKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality_model: DEFAULT_QUALITY_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            interaction_mode: InteractionMode::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            tools_dir: None,
            database: None,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            verifier: VerifierKind::default(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` for an unknown interaction mode
    /// or verifier, or a threshold that is not a number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let interaction_mode = match get("INTERACTION_MODE") {
            Some(mode) => mode
                .parse()
                .map_err(|message| EngineError::Configuration { message })?,
            None => defaults.interaction_mode,
        };
        let verifier = match get("WAYPOINT_VERIFIER") {
            Some(kind) => kind
                .parse()
                .map_err(|message| EngineError::Configuration { message })?,
            None => defaults.verifier,
        };
        let match_threshold = match get("WAYPOINT_MATCH_THRESHOLD") {
            Some(raw) => raw.trim().parse::<f32>().map_err(|e| EngineError::Configuration {
                message: format!("WAYPOINT_MATCH_THRESHOLD '{raw}': {e}"),
            })?,
            None => defaults.match_threshold,
        };

        Ok(Self {
            quality_model: get("QUALITY_MODEL_NAME").unwrap_or(defaults.quality_model),
            chat_model: get("CHAT_MODEL_NAME").unwrap_or(defaults.chat_model),
            interaction_mode,
            api_base: get("WAYPOINT_API_BASE").unwrap_or(defaults.api_base),
            api_key: get("WAYPOINT_API_KEY"),
            tools_dir: get("WAYPOINT_TOOLS_DIR").map(PathBuf::from),
            database: get("WAYPOINT_DATABASE").map(PathBuf::from),
            match_threshold,
            verifier,
        })
    }
}
