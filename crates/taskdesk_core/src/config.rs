//! Store configuration and user settings persistence.
//!
//! # Responsibility
//! - Resolve where the data file and logs live (`StoreConfig`).
//! - Carry user preferences as an explicit value (`AppSettings`) instead of
//!   process-wide ambient state.
//! - Persist settings through one collaborator (`SettingsStore`).
//!
//! # Invariants
//! - Loading settings never fails because of a missing or malformed file;
//!   defaults are returned instead.
//! - Saved settings are written to a temp file and renamed into place.

use crate::logging::default_log_level;
use crate::model::labels::Language;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "TASKDESK_DB_PATH";
pub const LOG_DIR_ENV: &str = "TASKDESK_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TASKDESK_LOG_LEVEL";
pub const DEFAULT_DB_FILE_NAME: &str = "tasks.db";

const VOLUME_MAX: u8 = 100;
const NOTIFICATION_TIMEOUT_MIN_SECS: u32 = 1;
const NOTIFICATION_TIMEOUT_MAX_SECS: u32 = 60;

/// Where the store keeps its data and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level().to_string(),
        }
    }
}

impl StoreConfig {
    /// Builds a config from `TASKDESK_*` environment variables.
    ///
    /// Blank values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
            log_level: non_blank(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
        }
    }
}

/// Interface color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

/// User preferences consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: Theme,
    pub language: Language,
    pub font_family: String,
    pub font_size: u32,
    pub auto_save: bool,
    pub start_minimized: bool,
    /// Ask before deleting tasks or categories.
    pub confirm_deletion: bool,
    pub sound_enabled: bool,
    /// Percent, `0..=100`.
    pub volume: u8,
    pub desktop_notifications: bool,
    /// Seconds, `1..=60`.
    pub notification_timeout_secs: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: Language::English,
            font_family: "Arial".to_string(),
            font_size: 10,
            auto_save: false,
            start_minimized: false,
            confirm_deletion: true,
            sound_enabled: true,
            volume: 50,
            desktop_notifications: true,
            notification_timeout_secs: 5,
        }
    }
}

impl AppSettings {
    /// Clamps numeric fields into their supported ranges.
    pub fn normalized(mut self) -> Self {
        self.volume = self.volume.min(VOLUME_MAX);
        self.notification_timeout_secs = self
            .notification_timeout_secs
            .clamp(NOTIFICATION_TIMEOUT_MIN_SECS, NOTIFICATION_TIMEOUT_MAX_SECS);
        if self.font_size == 0 {
            self.font_size = Self::default().font_size;
        }
        self
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "settings file error: {err}"),
            Self::Json(err) => write!(f, "settings encoding error: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// JSON-file persistence for [`AppSettings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings, falling back to defaults when the file is missing or
    /// cannot be decoded.
    pub fn load(&self) -> AppSettings {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return AppSettings::default();
            }
            Err(err) => {
                warn!(
                    "event=settings_load module=config status=warn fallback=defaults error={}",
                    err
                );
                return AppSettings::default();
            }
        };

        match serde_json::from_str::<AppSettings>(&text) {
            Ok(settings) => settings.normalized(),
            Err(err) => {
                warn!(
                    "event=settings_load module=config status=warn fallback=defaults error={}",
                    err
                );
                AppSettings::default()
            }
        }
    }

    /// Writes settings to disk, replacing the previous file.
    pub fn save(&self, settings: &AppSettings) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&settings.clone().normalized())?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;

        info!("event=settings_save module=config status=ok");
        Ok(())
    }

    /// Removes stored settings so the next load returns defaults.
    pub fn reset(&self) -> SettingsResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        info!("event=settings_reset module=config status=ok");
        Ok(())
    }
}
