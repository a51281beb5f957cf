//! Plan context CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{OptionalExtension, Row, params};

use super::{json_column, parse_column};
use crate::{
    error::{DatabaseResultExt, EngineError, Result},
    models::{Plan, PlanContext},
};

const INSERT_PLAN_CONTEXT_SQL: &str = "INSERT INTO plan_contexts (user_id, intent, plan_json, step_count, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const CLEAR_CHECKPOINTS_SQL: &str = "DELETE FROM step_checkpoints WHERE user_key = ?1";
const PLAN_CONTEXT_COLUMNS: &str = "id, user_id, intent, plan_json, created_at";
const DELETE_PLAN_CONTEXT_SQL: &str = "DELETE FROM plan_contexts WHERE id = ?1";

impl super::Database {
    /// Stores a completed plan for `user_id` and drops that user's
    /// checkpoints, in one transaction.
    pub fn insert_plan_context(&mut self, plan: &Plan, user_id: &str) -> Result<PlanContext> {
        let plan_json = serde_json::to_string(plan)?;
        let now = Timestamp::now();

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_PLAN_CONTEXT_SQL,
            params![
                user_id,
                &plan.intent,
                &plan_json,
                plan.steps.len() as i64,
                now.to_string()
            ],
        )
        .db_context("Failed to insert plan context")?;
        let id = tx.last_insert_rowid() as u64;

        tx.execute(CLEAR_CHECKPOINTS_SQL, params![user_id])
            .db_context("Failed to clear step checkpoints")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(PlanContext {
            id,
            user_id: user_id.to_string(),
            intent: plan.intent.clone(),
            plan: plan.clone(),
            created_at: now,
        })
    }

    /// Most recently stored context for this user and intent.
    pub fn find_latest_plan_context(
        &self,
        user_id: &str,
        intent: &str,
    ) -> Result<Option<PlanContext>> {
        let sql = format!(
            "SELECT {PLAN_CONTEXT_COLUMNS} FROM plan_contexts WHERE user_id = ?1 AND intent = ?2 ORDER BY id DESC LIMIT 1"
        );
        self.connection
            .query_row(&sql, params![user_id, intent], row_to_plan_context)
            .optional()
            .db_context("Failed to query plan context")
    }

    /// Retrieves a plan context by its ID.
    pub fn get_plan_context(&self, id: u64) -> Result<Option<PlanContext>> {
        let sql = format!("SELECT {PLAN_CONTEXT_COLUMNS} FROM plan_contexts WHERE id = ?1");
        self.connection
            .query_row(&sql, params![row_id(id)?], row_to_plan_context)
            .optional()
            .db_context("Failed to query plan context")
    }

    /// Lists stored contexts, newest first, optionally for one user only.
    pub fn list_plan_contexts(&self, user_id: Option<&str>) -> Result<Vec<PlanContext>> {
        let mut sql = format!("SELECT {PLAN_CONTEXT_COLUMNS} FROM plan_contexts");
        if user_id.is_some() {
            sql.push_str(" WHERE user_id = ?1");
        }
        sql.push_str(" ORDER BY id DESC");

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;
        let rows = match user_id {
            Some(user_id) => stmt.query_map(params![user_id], row_to_plan_context),
            None => stmt.query_map([], row_to_plan_context),
        }
        .db_context("Failed to query plan contexts")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read plan context rows")
    }

    /// Deletes a plan context.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlanContextNotFound` if no row has this ID.
    pub fn delete_plan_context(&mut self, id: u64) -> Result<()> {
        let affected = self
            .connection
            .execute(DELETE_PLAN_CONTEXT_SQL, params![row_id(id)?])
            .db_context("Failed to delete plan context")?;

        if affected == 0 {
            return Err(EngineError::PlanContextNotFound { id });
        }
        Ok(())
    }
}

fn row_to_plan_context(row: &Row<'_>) -> rusqlite::Result<PlanContext> {
    Ok(PlanContext {
        id: row.get::<_, i64>(0)? as u64,
        user_id: row.get(1)?,
        intent: row.get(2)?,
        plan: json_column(3, &row.get::<_, String>(3)?)?,
        created_at: parse_column(4, &row.get::<_, String>(4)?)?,
    })
}

/// SQLite rowids are signed; ids past `i64::MAX` cannot name a row.
fn row_id(id: u64) -> Result<i64> {
    i64::try_from(id)
        .map_err(|_| EngineError::invalid_input("id").with_reason(format!("{id} is out of range")))
}
