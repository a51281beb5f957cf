//! Core library for waypoint, a plan execution engine for tool-using
//! conversational agents.
//!
//! An intent is planned into steps, each step is bound to a tool, and the
//! [`Engine`] runs the steps one at a time: it asks a language model for the
//! step's arguments, calls the tool, verifies the result, and checkpoints
//! progress into plan-context memory. A pass halts on the first failure or
//! on a step that needs more input from the user, and can be resumed by
//! running the same plan again.
//!
//! Every collaborator sits behind a trait in [`services`] and is wired
//! through an [`AppContext`]. The crate ships production implementations for
//! all of them:
//!
//! - [`llm::OpenAiCompatibleModel`] for completions
//! - [`planning::ModelPlanner`] for both planners
//! - [`memory::RegistryStepMemory`] for tool lookup
//! - [`memory::PlanContextMemory`] for plan contexts (SQLite)
//! - [`registry::ProcessToolCaller`] for tools run as child processes
//! - [`verify::StatusVerifier`] and [`verify::ModelVerifier`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use waypoint_core::{
//!     AppContextBuilder, Engine, PlanContextMemoryBuilder, Settings,
//!     llm::OpenAiCompatibleModel, memory::RegistryStepMemory, planning::ModelPlanner,
//!     registry::{ProcessToolCaller, ToolRegistry},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let registry = Arc::new(ToolRegistry::scan_directory("tools".as_ref())?);
//! let model = Arc::new(OpenAiCompatibleModel::new(&settings.api_base, settings.api_key.clone()));
//! let planner = Arc::new(ModelPlanner::new(model.clone(), &settings.chat_model));
//! let store = PlanContextMemoryBuilder::new()
//!     .with_database_path(settings.database.as_ref())
//!     .build()
//!     .await?;
//!
//! let context = AppContextBuilder::new()
//!     .with_model(model)
//!     .with_intent_planner(planner.clone())
//!     .with_tool_planner(planner)
//!     .with_step_memory(Arc::new(RegistryStepMemory::new(&registry)))
//!     .with_plan_contexts(Arc::new(store))
//!     .with_tool_caller(Arc::new(ProcessToolCaller::new(registry)))
//!     .with_quality_model(&settings.quality_model)
//!     .build()?;
//!
//! let engine = Engine::new(context);
//! let run = engine.execute_intent("book a flight to Berlin", &[], "alice").await?;
//! println!("{run}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod invoker;
pub mod json;
pub mod llm;
pub mod memory;
pub mod models;
pub mod params;
pub mod planning;
pub mod prompts;
pub mod registry;
pub mod resolver;
pub mod services;
pub mod tracker;
pub mod verify;

// Re-export commonly used types
pub use config::{InteractionMode, Settings, VerifierKind};
pub use context::{AppContext, AppContextBuilder};
pub use db::Database;
pub use engine::{Engine, IntentRun};
pub use error::{EngineError, Result};
pub use memory::{PlanContextMemory, PlanContextMemoryBuilder};
pub use models::{
    ChatMessage, ExtractionVerdict, OutcomeStatus, PassReport, PassStatus, Plan, PlanContext,
    ReplanResponse, ReplanStatus, Step, StepOutcome, ToolCandidate,
};
pub use params::{Id, ListContexts, RunIntent};
pub use services::{
    IntentPlanner, LanguageModel, PlanContextStore, ProgressSink, ResultVerifier, StepMemory,
    ToolCaller, ToolPlanner,
};
