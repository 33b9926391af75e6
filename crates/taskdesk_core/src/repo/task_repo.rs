//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered list APIs over the `tasks` table.
//! - Keep SQL and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - List ordering is `created_at DESC, id DESC` (most recent first).
//! - `created_at` is written once on insert and never updated.
//! - Rows with unknown priority/status codes or malformed timestamps are
//!   skipped by list queries, not fatal.

use crate::model::category::CategoryId;
use crate::model::task::{Priority, Status, Task, TaskId};
use crate::model::timestamp::{format_timestamp, now_millis, parse_timestamp};
use crate::repo::{column_decode_error, ensure_connection_ready, RepoError, RepoResult};
use log::warn;
use rusqlite::types::{FromSql, Value};
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    priority,
    status,
    due_date,
    created_at,
    category_id
FROM tasks";

const TASK_ENTITY: &str = "task";

/// Query options for listing tasks. Filters combine with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub category_id: Option<CategoryId>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    /// Substring matched against title or description.
    ///
    /// Blank text is treated as no filter.
    pub text: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl TaskListQuery {
    pub fn by_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub fn by_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Aggregate counters for the progress summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
}

impl TaskStats {
    /// Completed share in whole percent, `0` when there are no tasks.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

/// Repository interface for task operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn set_task_status(&self, id: TaskId, status: Status) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn task_stats(&self) -> RepoResult<TaskStats>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when the `tasks` table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tasks", "categories"])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        if let Some(id) = task.id {
            return Err(RepoError::AlreadyPersisted {
                entity: TASK_ENTITY,
                id,
            });
        }
        task.validate()?;

        let created_at = task.created_at.unwrap_or_else(now_millis);
        self.conn.execute(
            "INSERT INTO tasks (
                title,
                description,
                priority,
                status,
                due_date,
                created_at,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.priority.code(),
                task.status.code(),
                task.due_date.map(format_timestamp),
                format_timestamp(created_at),
                task.category_id,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let id = task.id.ok_or(RepoError::MissingId(TASK_ENTITY))?;
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                priority = ?3,
                status = ?4,
                due_date = ?5,
                category_id = ?6
             WHERE id = ?7;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.priority.code(),
                task.status.code(),
                task.due_date.map(format_timestamp),
                task.category_id,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: TASK_ENTITY,
                id,
            });
        }

        Ok(())
    }

    fn set_task_status(&self, id: TaskId, status: Status) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2;",
            params![status.code(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: TASK_ENTITY,
                id,
            });
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: TASK_ENTITY,
                id,
            });
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_id = ?");
            bind_values.push(Value::Integer(category_id));
        }

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.code().to_string()));
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.code().to_string()));
        }

        if let Some(text) = query.text.as_deref().map(str::trim) {
            if !text.is_empty() {
                let pattern = like_pattern(text);
                sql.push_str(
                    " AND (title LIKE ? ESCAPE '\\' OR IFNULL(description, '') LIKE ? ESCAPE '\\')",
                );
                bind_values.push(Value::Text(pattern.clone()));
                bind_values.push(Value::Text(pattern));
            }
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            match parse_task_row(row) {
                Ok(task) => tasks.push(task),
                Err(RepoError::InvalidData(message)) => {
                    let row_id = row.get::<_, i64>("id").unwrap_or_default();
                    warn!(
                        "event=task_row_skipped module=repo status=warn task_id={} reason={}",
                        row_id, message
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(tasks)
    }

    fn task_stats(&self) -> RepoResult<TaskStats> {
        let (total, completed) = self.conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = ?1 THEN 1 ELSE 0 END), 0)
             FROM tasks;",
            [Status::Completed.code()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;

        Ok(TaskStats {
            total: u64::try_from(total).unwrap_or_default(),
            completed: u64::try_from(completed).unwrap_or_default(),
        })
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let priority_text: String = column(row, "priority")?;
    let priority = Priority::from_code(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let status_text: String = column(row, "status")?;
    let status = Status::from_code(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let due_date = match column::<Option<String>>(row, "due_date")? {
        Some(value) => Some(parse_timestamp(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid timestamp `{value}` in tasks.due_date"))
        })?),
        None => None,
    };

    let created_text: String = column(row, "created_at")?;
    let created_at = parse_timestamp(&created_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{created_text}` in tasks.created_at"
        ))
    })?;

    Ok(Task {
        id: Some(column(row, "id")?),
        title: column(row, "title")?,
        description: column::<Option<String>>(row, "description")?.unwrap_or_default(),
        priority,
        status,
        due_date,
        created_at: Some(created_at),
        category_id: column(row, "category_id")?,
    })
}

fn column<T: FromSql>(row: &Row<'_>, name: &str) -> RepoResult<T> {
    row.get(name).map_err(|err| column_decode_error(name, err))
}

/// Builds a `LIKE` pattern that matches `text` literally as a substring.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
