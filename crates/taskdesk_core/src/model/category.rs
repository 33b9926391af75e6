//! Category domain model.

use crate::model::{validate_id, validate_timestamp, ModelValidationError};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Storage-assigned category identifier.
pub type CategoryId = i64;

/// Color used for categories created without an explicit choice.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3498db";

/// Categories seeded on first start, as `(name, color)`.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Work", "#FF6B6B"),
    ("Personal", "#4ECDC4"),
    ("Study", "#45B7D1"),
    ("Shopping", "#96CEB4"),
];

/// A named, colored grouping label for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    /// Free-form color text, usually a hex code. Not validated.
    pub color: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
            created_at: None,
        }
    }

    /// Creates an unsaved category with `DEFAULT_CATEGORY_COLOR`.
    pub fn with_default_color(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_CATEGORY_COLOR)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyCategoryName);
        }
        validate_id(self.id)?;
        validate_timestamp("created_at", self.created_at)
    }
}

/// Normalizes a category name for storage and lookup.
///
/// Trims the ends and collapses inner whitespace runs to one space.
pub fn normalize_category_name(name: &str) -> String {
    WHITESPACE_RE.replace_all(name.trim(), " ").into_owned()
}
