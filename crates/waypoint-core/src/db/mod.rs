//! SQLite storage for plan contexts and step checkpoints.
//!
//! This module holds the synchronous, connection-level queries. The async
//! facade that the engine talks to is [`crate::memory::PlanContextMemory`],
//! which opens a [`Database`] inside `spawn_blocking` for every operation.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod checkpoint_queries;
pub mod migrations;
pub mod plan_context_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Maps a text column that should hold a value of `T` into a row error.
pub(crate) fn parse_column<T, E>(index: usize, text: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = E>,
    E: std::error::Error + Send + Sync + 'static,
{
    text.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Maps a JSON text column into a row error on failure.
pub(crate) fn json_column<T: serde::de::DeserializeOwned>(
    index: usize,
    text: &str,
) -> rusqlite::Result<T> {
    serde_json::from_str(text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}
