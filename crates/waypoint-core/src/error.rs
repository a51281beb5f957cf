//! Error types for the engine and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a pass or a memory operation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// SQLite failed underneath plan-context memory
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// No stored plan context has this ID
    #[error("Plan context with ID {id} not found")]
    PlanContextNotFound { id: u64 },
    /// A step reached execution without a resolved tool or schema
    #[error("Step {index} has no resolved tool binding: {reason}")]
    UnboundStep { index: usize, reason: String },
    /// The registry has no tool under this name
    #[error("Tool '{tool}' is not registered")]
    ToolNotFound { tool: String },
    /// Spawning or talking to a tool failed before it produced a result
    #[error("Tool '{tool}' could not be called: {message}")]
    ToolCall { tool: String, message: String },
    /// A language model reply could not be read as the expected structure
    #[error("Malformed model output while {context}: {reply}")]
    MalformedModelOutput { context: String, reply: String },
    /// Transport or API errors from the completion endpoint
    #[error("Language model error: {message}")]
    LanguageModel { message: String },
    /// Reading a manifest directory or creating the database directory failed
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The default data directory could not be resolved
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// A caller passed an argument the engine cannot act on
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// JSON encoding or decoding failed
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Settings or context wiring is incomplete or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Pairs a database message with its `rusqlite` cause.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn with_source(self, source: rusqlite::Error) -> EngineError {
        EngineError::Database {
            message: self.message,
            source,
        }
    }
}

/// Names the offending field before the reason is known.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn with_reason(self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl EngineError {
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for a reply that failed to parse during `context`.
    pub fn malformed(context: impl Into<String>, reply: impl Into<String>) -> Self {
        Self::MalformedModelOutput {
            context: context.into(),
            reply: reply.into(),
        }
    }

    /// Error raised when a blocking task panics or is cancelled.
    pub(crate) fn join(e: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {e}"),
        }
    }
}

/// Attaches a message to `rusqlite` results.
pub trait DatabaseResultExt<T> {
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| EngineError::database(message).with_source(e))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
