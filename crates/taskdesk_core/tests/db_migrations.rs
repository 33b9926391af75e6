use rusqlite::Connection;
use std::path::Path;
use taskdesk_core::db::migrations::latest_version;
use taskdesk_core::db::{open_db, open_db_in_memory, seed_default_categories, DbError};
use taskdesk_core::{
    Category, CategoryRepository, RepoError, SqliteCategoryRepository, DEFAULT_CATEGORIES,
};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
    assert_table_exists(&conn, "categories");
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let mut conn_first = open_db(&path).unwrap();
    seed_default_categories(&mut conn_first).unwrap();
    conn_first
        .execute(
            "INSERT INTO tasks (title, priority, status) VALUES ('keep me', 'low', 'pending');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(count(&conn_second, "tasks"), 1);
    assert_eq!(count(&conn_second, "categories"), DEFAULT_CATEGORIES.len() as i64);
}

#[test]
fn seeding_twice_does_not_duplicate_defaults() {
    let mut conn = open_db_in_memory().unwrap();

    let first = seed_default_categories(&mut conn).unwrap();
    let second = seed_default_categories(&mut conn).unwrap();

    assert_eq!(first, DEFAULT_CATEGORIES.len());
    assert_eq!(second, 0);
    assert_eq!(count(&conn, "categories"), DEFAULT_CATEGORIES.len() as i64);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn legacy_file_is_upgraded_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = legacy_file(&path);
    conn.execute_batch(
        "INSERT INTO tasks (title, description, priority, status, due_date, created_at)
        VALUES ('old', '', 'Высокий', 'В процессе', '2024-05-01T00:00:00', '2024-04-30 08:15:00');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let (priority, status, due_date, created_at): (String, String, String, String) = conn
        .query_row(
            "SELECT priority, status, due_date, created_at FROM tasks;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();

    assert_eq!(priority, "high");
    assert_eq!(status, "in_progress");
    assert_eq!(due_date, "2024-05-01T00:00:00.000Z");
    assert_eq!(created_at, "2024-04-30T08:15:00.000Z");
}

#[test]
fn legacy_case_variant_categories_merge_and_stay_unique() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = legacy_file(&path);
    conn.execute_batch(
        "INSERT INTO categories (id, name, color) VALUES (1, 'Work', '#FF6B6B');
        INSERT INTO categories (id, name, color) VALUES (2, 'work', '#000000');
        INSERT INTO tasks (title, priority, status, category_id)
        VALUES ('on duplicate', 'low', 'pending', 2);",
    )
    .unwrap();
    drop(conn);

    let mut conn = open_db(&path).unwrap();
    assert_eq!(count(&conn, "categories"), 1);
    assert_eq!(count(&conn, "tasks"), 1);
    let category_id: i64 = conn
        .query_row("SELECT category_id FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(category_id, 1);

    let repo = SqliteCategoryRepository::try_new(&mut conn).unwrap();
    let err = repo
        .create_category(&Category::with_default_color("WORK"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateCategoryName(_)));
}

#[test]
fn failing_schema_step_reports_its_version_and_keeps_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db");

    // No `created_at` column, so the step 2 index cannot be built.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, name TEXT, color TEXT, created_at TEXT);
        CREATE TABLE tasks (id INTEGER PRIMARY KEY, title TEXT, category_id INTEGER);",
    )
    .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Migration { version: 2, .. }));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
}

fn legacy_file(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE TABLE tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            priority TEXT NOT NULL,
            status TEXT NOT NULL,
            due_date TIMESTAMP,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            category_id INTEGER,
            FOREIGN KEY (category_id) REFERENCES categories (id)
        );",
    )
    .unwrap();
    conn
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
