//! Default category seeding.
//!
//! # Invariants
//! - Seeding is insert-if-absent keyed on the category name constraint, so
//!   repeated runs never duplicate rows or touch user edits.

use super::DbResult;
use crate::model::category::DEFAULT_CATEGORIES;
use crate::model::timestamp::{format_timestamp, now_millis};
use rusqlite::{params, Connection};

/// Inserts missing default categories and returns how many rows were added.
pub fn seed_default_categories(conn: &mut Connection) -> DbResult<usize> {
    let created_at = format_timestamp(now_millis());
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO categories (name, color, created_at) VALUES (?1, ?2, ?3);",
        )?;
        for (name, color) in DEFAULT_CATEGORIES {
            inserted += stmt.execute(params![name, color, created_at.as_str()])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}
