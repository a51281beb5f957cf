//! Schema setup for plan-context memory.

use crate::error::{DatabaseResultExt, Result};

const SCHEMA: &str = include_str!("../../assets/schema.sql");

impl super::Database {
    /// Creates the plan context and checkpoint tables if they are missing.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute_batch(SCHEMA)
            .db_context("Failed to create plan context tables")
    }
}
