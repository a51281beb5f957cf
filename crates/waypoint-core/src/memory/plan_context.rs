//! SQLite-backed plan-context memory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio::task;

use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{Plan, PlanContext, StepCheckpoint},
    params::{Id, ListContexts},
    services::PlanContextStore,
};

/// Durable plan-context memory stored in a SQLite file.
///
/// Every operation opens its own connection on the blocking pool, so the
/// handle is cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct PlanContextMemory {
    pub(crate) db_path: PathBuf,
}

impl PlanContextMemory {
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_db<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(EngineError::join)?
    }

    /// Stores a completed plan and returns the stored record.
    pub async fn store_plan(&self, plan: &Plan, user_id: &str) -> Result<PlanContext> {
        let plan = plan.clone();
        let user_id = user_id.to_string();
        self.with_db(move |db| db.insert_plan_context(&plan, &user_id))
            .await
    }

    /// Lists stored contexts, newest first.
    pub async fn list_plan_contexts(&self, params: &ListContexts) -> Result<Vec<PlanContext>> {
        let user_id = params.user_id.clone();
        self.with_db(move |db| db.list_plan_contexts(user_id.as_deref()))
            .await
    }

    /// Retrieves a stored context by its ID.
    pub async fn get_plan_context(&self, params: &Id) -> Result<Option<PlanContext>> {
        let id = params.id;
        self.with_db(move |db| db.get_plan_context(id)).await
    }

    /// Deletes a stored context.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlanContextNotFound` if the ID is unknown.
    pub async fn delete_plan_context(&self, params: &Id) -> Result<()> {
        let id = params.id;
        self.with_db(move |db| db.delete_plan_context(id)).await
    }

    /// Checkpoints written for `user_key` since its last stored plan.
    pub async fn list_checkpoints(&self, user_key: &str) -> Result<Vec<StepCheckpoint>> {
        let user_key = user_key.to_string();
        self.with_db(move |db| db.list_checkpoints(&user_key)).await
    }
}

#[async_trait]
impl PlanContextStore for PlanContextMemory {
    async fn create_plan_context(&self, plan: &Plan, user_id: &str) -> Result<()> {
        let stored = self.store_plan(plan, user_id).await?;
        debug!("plan context {} stored for {user_id}", stored.id);
        Ok(())
    }

    async fn update_step_status_context(
        &self,
        index: usize,
        execution_result: &Value,
        executed: bool,
        user_key: &str,
    ) -> Result<()> {
        let result = execution_result.clone();
        let user_key = user_key.to_string();
        self.with_db(move |db| {
            db.upsert_checkpoint(&user_key, index, &result, executed)
                .map(|_| ())
        })
        .await
    }

    async fn find_plan_context(&self, user_id: &str, intent: &str) -> Result<Option<Plan>> {
        let user_id = user_id.to_string();
        let intent = intent.to_string();
        let found = self
            .with_db(move |db| db.find_latest_plan_context(&user_id, &intent))
            .await?;
        Ok(found.map(|context| context.plan))
    }
}

/// Builder for creating and configuring [`PlanContextMemory`] instances.
#[derive(Debug, Clone, Default)]
pub struct PlanContextMemoryBuilder {
    database_path: Option<PathBuf>,
}

impl PlanContextMemoryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/waypoint/waypoint.db` or
    /// `~/.local/share/waypoint/waypoint.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Creates the database file and schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the parent directory cannot be
    /// created, `EngineError::XdgDirectory` if no default path can be found,
    /// and `EngineError::Database` if schema initialization fails.
    pub async fn build(self) -> Result<PlanContextMemory> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let init_path = db_path.clone();
        task::spawn_blocking(move || Database::new(&init_path).map(|_| ()))
            .await
            .map_err(EngineError::join)??;

        debug!("plan context memory at {}", db_path.display());
        Ok(PlanContextMemory { db_path })
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("waypoint")
            .place_data_file("waypoint.db")
            .map_err(|e| EngineError::XdgDirectory(e.to_string()))
    }
}
