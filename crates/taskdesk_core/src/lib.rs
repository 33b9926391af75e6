//! Core domain logic for TaskDesk.
//! This crate owns task/category persistence and the invariants around it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppSettings, SettingsError, SettingsStore, StoreConfig, Theme};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::category::{Category, CategoryId, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR};
pub use model::labels::Language;
pub use model::task::{Priority, Status, Task, TaskId};
pub use model::ModelValidationError;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository, TaskStats};
pub use repo::{RepoError, RepoResult};
pub use service::task_store::{StoreError, StoreResult, TaskStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
