//! Task domain model.
//!
//! # Responsibility
//! - Define the task record persisted in the `tasks` table.
//! - Map priority/status enumerations to stable storage codes.
//!
//! # Invariants
//! - `title` is non-empty after trimming.
//! - `created_at` is set once at first write and never changed by updates.
//! - `category_id` is a weak reference; it may become `None` when the
//!   category is deleted.

use crate::model::category::CategoryId;
use crate::model::timestamp::to_storage_precision;
use crate::model::{validate_id, validate_timestamp, ModelValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned task identifier.
pub type TaskId = i64;

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Stable storage code.
    pub fn code(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parses a storage code. Unknown codes return `None`.
    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Task progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    /// Stable storage code.
    pub fn code(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }

    /// Parses a storage code. Unknown codes return `None`.
    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Status::Pending),
            "in_progress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }
}

/// A user-tracked unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// `None` until the task is persisted.
    pub id: Option<TaskId>,
    pub title: String,
    /// May be empty.
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    /// Stored with millisecond precision.
    pub due_date: Option<DateTime<Utc>>,
    /// Filled by storage on insert when absent.
    pub created_at: Option<DateTime<Utc>>,
    pub category_id: Option<CategoryId>,
}

impl Task {
    /// Creates an unsaved task with default priority and status.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: Status::default(),
            due_date: None,
            created_at: None,
            category_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets the due date, truncated to millisecond precision.
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(to_storage_precision(due_date));
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Validates persisted-state invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InvalidId` when `id` or `category_id` is not positive.
    /// - `TimestampOutOfRange` when `due_date` or `created_at` falls outside
    ///   years `0..=9999`.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.title.trim().is_empty() {
            return Err(ModelValidationError::EmptyTitle);
        }
        validate_id(self.id)?;
        validate_id(self.category_id)?;
        validate_timestamp("due_date", self.due_date)?;
        validate_timestamp("created_at", self.created_at)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Returns whether the due date has passed for an unfinished task.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }
}
