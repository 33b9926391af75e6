//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/lookup/delete APIs over the `categories` table.
//! - Own the cascade-to-null step that detaches tasks from a deleted category.
//!
//! # Invariants
//! - Category names are unique case-insensitively (`COLLATE NOCASE`).
//! - `delete_category` nulls task references and removes the row in one
//!   transaction; a missing category rolls back without side effects.

use crate::model::category::{normalize_category_name, Category, CategoryId};
use crate::model::timestamp::{format_timestamp, now_millis, parse_timestamp};
use crate::repo::{
    column_decode_error, ensure_connection_ready, is_unique_violation, RepoError, RepoResult,
};
use log::warn;
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Row, TransactionBehavior};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, color, created_at FROM categories";
const CATEGORY_ENTITY: &str = "category";

/// Repository interface for category operations.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Case-insensitive lookup by normalized name.
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Deletes a category and returns how many tasks were detached from it.
    fn delete_category(&mut self, id: CategoryId) -> RepoResult<usize>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["categories", "tasks"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        if let Some(id) = category.id {
            return Err(RepoError::AlreadyPersisted {
                entity: CATEGORY_ENTITY,
                id,
            });
        }
        category.validate()?;

        let name = normalize_category_name(&category.name);
        let created_at = category.created_at.unwrap_or_else(now_millis);
        let result = self.conn.execute(
            "INSERT INTO categories (name, color, created_at) VALUES (?1, ?2, ?3);",
            params![name.as_str(), category.color.as_str(), format_timestamp(created_at)],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateCategoryName(name))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} WHERE name = ?1 COLLATE NOCASE LIMIT 1;"
        ))?;
        let mut rows = stmt.query([normalize_category_name(name)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            match parse_category_row(row) {
                Ok(category) => categories.push(category),
                Err(RepoError::InvalidData(message)) => {
                    warn!(
                        "event=category_row_skipped module=repo status=warn reason={}",
                        message
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(categories)
    }

    fn delete_category(&mut self, id: CategoryId) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let detached = tx.execute(
            "UPDATE tasks SET category_id = NULL WHERE category_id = ?1;",
            [id],
        )?;
        let deleted = tx.execute("DELETE FROM categories WHERE id = ?1;", [id])?;

        if deleted == 0 {
            // Dropping `tx` rolls back the detach step.
            return Err(RepoError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            });
        }

        tx.commit()?;
        Ok(detached)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let created_at = match column::<Option<String>>(row, "created_at")? {
        Some(value) => Some(parse_timestamp(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{value}` in categories.created_at"
            ))
        })?),
        None => None,
    };

    Ok(Category {
        id: Some(column(row, "id")?),
        name: column(row, "name")?,
        color: column(row, "color")?,
        created_at,
    })
}

fn column<T: FromSql>(row: &Row<'_>, name: &str) -> RepoResult<T> {
    row.get(name).map_err(|err| column_decode_error(name, err))
}
