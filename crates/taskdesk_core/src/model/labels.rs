//! Display labels for closed enumerations.
//!
//! Labels are presentation text only. Storage always uses the stable codes
//! exposed by `Priority::code` / `Status::code`.

use crate::model::task::{Priority, Status};
use serde::{Deserialize, Serialize};

/// Interface language used to render labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Russian];
}

impl Priority {
    /// Returns the human-readable label for this priority.
    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, Priority::Low) => "Low",
            (Language::English, Priority::Medium) => "Medium",
            (Language::English, Priority::High) => "High",
            (Language::Russian, Priority::Low) => "Низкий",
            (Language::Russian, Priority::Medium) => "Средний",
            (Language::Russian, Priority::High) => "Высокий",
        }
    }

    /// Resolves a label in any supported language back to its value.
    pub fn from_label(label: &str) -> Option<Self> {
        Priority::ALL.into_iter().find(|priority| {
            Language::ALL
                .iter()
                .any(|language| priority.label(*language) == label)
        })
    }
}

impl Status {
    /// Returns the human-readable label for this status.
    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, Status::Pending) => "Pending",
            (Language::English, Status::InProgress) => "In progress",
            (Language::English, Status::Completed) => "Completed",
            (Language::Russian, Status::Pending) => "В ожидании",
            (Language::Russian, Status::InProgress) => "В процессе",
            (Language::Russian, Status::Completed) => "Завершено",
        }
    }

    /// Resolves a label in any supported language back to its value.
    pub fn from_label(label: &str) -> Option<Self> {
        Status::ALL.into_iter().find(|status| {
            Language::ALL
                .iter()
                .any(|language| status.label(*language) == label)
        })
    }
}
