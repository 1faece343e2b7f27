//! Configuration types for the daily verse service.

use crate::error::{Result, VerseError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConfig {
    /// Persisted key-value store settings.
    pub storage: StorageConfig,
    /// Next-morning reminder settings.
    pub reminder: ReminderConfig,
    /// Content collection source.
    pub content: ContentConfig,
    /// Keys cleared on logout.
    pub session: SessionConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Persisted store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Fixed key under which the daily record is stored.
    pub key: String,
    /// Store file path (None = `data_dir()/store.json`).
    pub state_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: "dailyVerse".to_owned(),
            state_file: None,
        }
    }
}

impl StorageConfig {
    /// Resolved store file path.
    #[must_use]
    pub fn resolved_state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(crate::app_dirs::store_file)
    }
}

/// Reminder configuration.
///
/// The reminder fires on the day after a refresh at `hour:minute` local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Whether push reminders are scheduled at all.
    pub enabled: bool,
    /// Hour of day (0-23, local).
    pub hour: u8,
    /// Minute of hour (0-59).
    pub minute: u8,
    /// Notification title.
    pub title: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: 8,
            minute: 0,
            title: "Verse of the Day".to_owned(),
        }
    }
}

/// Content collection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// JSON collection file (None = bundled sample collection).
    pub collection_path: Option<PathBuf>,
    /// Fixed RNG seed for reproducible selection.
    pub seed: Option<u64>,
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Store keys removed by logout.
    pub keys: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keys: vec!["userToken".to_owned(), "userProfile".to_owned()],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Also write a daily-rolling log file under `logs_dir()`.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "daily_verse=info".to_owned(),
            file: false,
        }
    }
}

impl DailyConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| VerseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only when an existing file is unreadable or invalid.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VerseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`VerseError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(VerseError::Config("storage.key must not be empty".to_owned()));
        }
        if self.reminder.hour > 23 {
            return Err(VerseError::Config(format!(
                "reminder.hour must be 0-23, got {}",
                self.reminder.hour
            )));
        }
        if self.reminder.minute > 59 {
            return Err(VerseError::Config(format!(
                "reminder.minute must be 0-59, got {}",
                self.reminder.minute
            )));
        }
        if self
            .session
            .keys
            .iter()
            .any(|key| key == &self.storage.key)
        {
            return Err(VerseError::Config(
                "session.keys must not include the daily record key".to_owned(),
            ));
        }
        Ok(())
    }
}
