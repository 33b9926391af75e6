//! Task store facade used by presentation layers.
//!
//! # Responsibility
//! - Own the data file path and open one scoped connection per call.
//! - Expose task/category CRUD, filter, search and statistics use-cases.
//! - Apply the failure policy: reads degrade, writes propagate.
//!
//! # Invariants
//! - Connections never outlive a call; they are released on every exit path.
//! - Read operations never fail; errors are logged and yield empty results.
//! - Write operations never report success unless the statement committed.
//! - Update/delete of a missing identifier yields `Ok(false)`, not an error.

use crate::config::StoreConfig;
use crate::db::{open_db, seed_default_categories, DbError};
use crate::model::category::{Category, CategoryId};
use crate::model::task::{Status, Task, TaskId};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository, TaskStats};
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error surfaced to callers of write operations.
#[derive(Debug)]
pub enum StoreError {
    /// Data file or schema cannot be created. The application cannot continue.
    Initialization(DbError),
    /// A write failed and must be reported to the user.
    Storage(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialization(err) => write!(f, "task store initialization failed: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Initialization(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// File-backed task store.
#[derive(Debug, Clone)]
pub struct TaskStore {
    db_path: PathBuf,
}

impl TaskStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.db_path.clone())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Creates the data file and schema when absent and seeds default
    /// categories. Safe to call on every startup.
    ///
    /// # Errors
    /// - `Initialization` when the file cannot be opened or migrated.
    pub fn initialize(&self) -> StoreResult<()> {
        let mut conn = open_db(&self.db_path).map_err(|err| {
            error!(
                "event=store_init module=store status=error error_code=db_open_failed error={}",
                err
            );
            StoreError::Initialization(err)
        })?;

        let seeded = seed_default_categories(&mut conn).map_err(|err| {
            error!(
                "event=store_init module=store status=error error_code=seed_failed error={}",
                err
            );
            StoreError::Initialization(err)
        })?;

        info!(
            "event=store_init module=store status=ok seeded_categories={}",
            seeded
        );
        Ok(())
    }

    /// Inserts a new task and returns its identifier.
    pub fn add_task(&self, task: &Task) -> StoreResult<TaskId> {
        let result =
            self.with_connection(|conn| SqliteTaskRepository::try_new(conn)?.create_task(task));
        let id = log_write("task_add", result)?;
        info!("event=task_add module=store status=ok task_id={id}");
        Ok(id)
    }

    /// Returns all tasks, most recently created first.
    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.filter_tasks(&TaskListQuery::default())
    }

    /// Returns one task, or `None` when missing or unreadable.
    pub fn get_task(&self, id: TaskId) -> Option<Task> {
        self.read("task_get", |conn| {
            SqliteTaskRepository::try_new(conn)?.get_task(id)
        })
    }

    /// Replaces the mutable fields of a stored task.
    ///
    /// Returns `Ok(false)` when no task has `task.id`. A non-positive id can
    /// never be stored, so it is reported the same way.
    pub fn update_task(&self, task: &Task) -> StoreResult<bool> {
        if task.id.is_some_and(|id| id <= 0) {
            return Ok(false);
        }
        let result =
            self.with_connection(|conn| SqliteTaskRepository::try_new(conn)?.update_task(task));
        let updated = found(log_write("task_update", result))?;
        if updated {
            info!(
                "event=task_update module=store status=ok task_id={}",
                task.id.unwrap_or_default()
            );
        }
        Ok(updated)
    }

    /// Marks a task as completed.
    pub fn complete_task(&self, id: TaskId) -> StoreResult<bool> {
        let result = self.with_connection(|conn| {
            SqliteTaskRepository::try_new(conn)?.set_task_status(id, Status::Completed)
        });
        let completed = found(log_write("task_complete", result))?;
        if completed {
            info!("event=task_complete module=store status=ok task_id={id}");
        }
        Ok(completed)
    }

    /// Deletes a task. Returns `Ok(false)` when it does not exist.
    pub fn delete_task(&self, id: TaskId) -> StoreResult<bool> {
        let result =
            self.with_connection(|conn| SqliteTaskRepository::try_new(conn)?.delete_task(id));
        let deleted = found(log_write("task_delete", result))?;
        if deleted {
            info!("event=task_delete module=store status=ok task_id={id}");
        }
        Ok(deleted)
    }

    /// Returns all categories in storage order.
    pub fn get_categories(&self) -> Vec<Category> {
        self.read("category_list", |conn| {
            SqliteCategoryRepository::try_new(conn)?.list_categories()
        })
    }

    /// Inserts a new category and returns its identifier.
    ///
    /// # Errors
    /// - `Storage(DuplicateCategoryName)` when a category with the same name
    ///   exists, ignoring case.
    pub fn add_category(&self, category: &Category) -> StoreResult<CategoryId> {
        let result = self.with_connection(|conn| {
            let repo = SqliteCategoryRepository::try_new(conn)?;
            if let Some(existing) = repo.find_category_by_name(&category.name)? {
                return Err(RepoError::DuplicateCategoryName(existing.name));
            }
            repo.create_category(category)
        });
        let id = log_write("category_add", result)?;
        info!("event=category_add module=store status=ok category_id={id}");
        Ok(id)
    }

    /// Deletes a category after detaching every task that references it.
    ///
    /// Both steps commit together. Returns `Ok(false)` when the category does
    /// not exist, in which case no task is modified.
    pub fn delete_category(&self, id: CategoryId) -> StoreResult<bool> {
        let result = self.with_connection(|conn| {
            SqliteCategoryRepository::try_new(conn)?.delete_category(id)
        });
        match log_write("category_delete", result) {
            Ok(detached) => {
                info!(
                    "event=category_delete module=store status=ok category_id={} detached_tasks={}",
                    id, detached
                );
                Ok(true)
            }
            Err(StoreError::Storage(RepoError::NotFound { .. })) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Returns tasks assigned to `category_id`, most recent first.
    pub fn get_tasks_by_category(&self, category_id: CategoryId) -> Vec<Task> {
        self.filter_tasks(&TaskListQuery::by_category(category_id))
    }

    /// Returns tasks whose title or description contains `text`.
    ///
    /// Blank text means no filter and yields the same result as
    /// [`TaskStore::get_all_tasks`].
    pub fn search_tasks(&self, text: &str) -> Vec<Task> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.get_all_tasks();
        }
        self.filter_tasks(&TaskListQuery::by_text(trimmed))
    }

    /// Returns tasks matching every filter set in `query`.
    pub fn filter_tasks(&self, query: &TaskListQuery) -> Vec<Task> {
        self.read("task_list", |conn| {
            SqliteTaskRepository::try_new(conn)?.list_tasks(query)
        })
    }

    /// Returns total/completed counters.
    pub fn statistics(&self) -> TaskStats {
        self.read("task_stats", |conn| {
            SqliteTaskRepository::try_new(conn)?.task_stats()
        })
    }

    fn with_connection<T>(
        &self,
        operation: impl FnOnce(&mut Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut conn = open_db(&self.db_path)?;
        operation(&mut conn)
    }

    fn read<T: Default>(
        &self,
        event: &'static str,
        operation: impl FnOnce(&mut Connection) -> RepoResult<T>,
    ) -> T {
        match self.with_connection(operation) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event={} module=store status=warn fallback=empty error={}",
                    event, err
                );
                T::default()
            }
        }
    }
}

fn log_write<T>(event: &'static str, result: RepoResult<T>) -> StoreResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err @ RepoError::NotFound { .. }) => Err(err.into()),
        Err(err) => {
            error!("event={} module=store status=error error={}", event, err);
            Err(err.into())
        }
    }
}

fn found(result: StoreResult<()>) -> StoreResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(StoreError::Storage(RepoError::NotFound { .. })) => Ok(false),
        Err(err) => Err(err),
    }
}
