//! Domain model exchanged between storage and presentation.
//!
//! # Responsibility
//! - Define the value types persisted by core (`Task`, `Category`).
//! - Own the closed enumerations and their stable storage codes.
//!
//! # Invariants
//! - Identifiers are assigned by storage; a fresh value carries `id = None`.
//! - Stored codes are independent from display labels (see `labels`).

use chrono::{DateTime, Datelike, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod labels;
pub mod task;
pub mod timestamp;

/// Validation error shared by task and category values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Task title is empty or whitespace-only.
    EmptyTitle,
    /// Category name is empty or whitespace-only.
    EmptyCategoryName,
    /// Identifier must be strictly positive when present.
    InvalidId(i64),
    /// Timestamp year cannot be written in the four-digit storage layout.
    TimestampOutOfRange { field: &'static str, year: i32 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyCategoryName => write!(f, "category name cannot be empty"),
            Self::InvalidId(id) => write!(f, "identifier must be positive, got {id}"),
            Self::TimestampOutOfRange { field, year } => write!(
                f,
                "{field} year {year} is outside {}..={}",
                timestamp::MIN_STORABLE_YEAR,
                timestamp::MAX_STORABLE_YEAR
            ),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn validate_id(id: Option<i64>) -> Result<(), ModelValidationError> {
    match id {
        Some(value) if value <= 0 => Err(ModelValidationError::InvalidId(value)),
        _ => Ok(()),
    }
}

pub(crate) fn validate_timestamp(
    field: &'static str,
    value: Option<DateTime<Utc>>,
) -> Result<(), ModelValidationError> {
    match value {
        Some(value) if !timestamp::is_storable(value) => {
            Err(ModelValidationError::TimestampOutOfRange {
                field,
                year: value.year(),
            })
        }
        _ => Ok(()),
    }
}
