//! Step checkpoint queries.

use jiff::Timestamp;
use rusqlite::{Row, params};
use serde_json::Value;

use super::{json_column, parse_column};
use crate::{
    error::{DatabaseResultExt, Result},
    models::StepCheckpoint,
};

const UPSERT_CHECKPOINT_SQL: &str = "INSERT INTO step_checkpoints (user_key, step_index, execution_result, executed, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT(user_key, step_index) DO UPDATE SET execution_result = excluded.execution_result, executed = excluded.executed, updated_at = excluded.updated_at";
const SELECT_CHECKPOINTS_SQL: &str = "SELECT user_key, step_index, execution_result, executed, updated_at FROM step_checkpoints WHERE user_key = ?1 ORDER BY step_index";

impl super::Database {
    /// Records the latest result of one step for `user_key`. A later write
    /// for the same step replaces the earlier one.
    pub fn upsert_checkpoint(
        &mut self,
        user_key: &str,
        step_index: usize,
        execution_result: &Value,
        executed: bool,
    ) -> Result<StepCheckpoint> {
        let now = Timestamp::now();
        self.connection
            .execute(
                UPSERT_CHECKPOINT_SQL,
                params![
                    user_key,
                    step_index as i64,
                    serde_json::to_string(execution_result)?,
                    executed,
                    now.to_string()
                ],
            )
            .db_context("Failed to write step checkpoint")?;

        Ok(StepCheckpoint {
            user_key: user_key.to_string(),
            step_index,
            execution_result: execution_result.clone(),
            executed,
            updated_at: now,
        })
    }

    /// Checkpoints for `user_key` ordered by step index.
    pub fn list_checkpoints(&self, user_key: &str) -> Result<Vec<StepCheckpoint>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_CHECKPOINTS_SQL)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(params![user_key], row_to_checkpoint)
            .db_context("Failed to query step checkpoints")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read step checkpoint rows")
    }
}

fn row_to_checkpoint(row: &Row<'_>) -> rusqlite::Result<StepCheckpoint> {
    Ok(StepCheckpoint {
        user_key: row.get(0)?,
        step_index: row.get::<_, i64>(1)? as usize,
        execution_result: json_column(2, &row.get::<_, String>(2)?)?,
        executed: row.get(3)?,
        updated_at: parse_column(4, &row.get::<_, String>(4)?)?,
    })
}
