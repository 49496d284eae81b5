//! Application settings
//!
//! Persisted separately from the record blob in LocalStorage. Every field
//! has a default, so partial JSON overrides are accepted.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TABLE_HEIGHT_PX, SETTINGS_KEY, STORAGE_KEY};
use crate::persistence::{KeyValueStorage, StorageError};

/// Runtime tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key the record blob is stored under
    pub storage_key: String,
    /// Table height before the container scrolls (pixels)
    pub max_table_height_px: u32,
    /// Log level name (trace|debug|info|warn|error)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            max_table_height_px: MAX_TABLE_HEIGHT_PX,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parsed log level, `Info` for unknown names
    pub fn log_level(&self) -> log::Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => log::Level::Trace,
            "debug" => log::Level::Debug,
            "warn" | "warning" => log::Level::Warn,
            "error" => log::Level::Error,
            _ => log::Level::Info,
        }
    }

    /// Load settings from storage, defaults when missing or unreadable
    pub fn load<S: KeyValueStorage + ?Sized>(storage: &S) -> Self {
        if let Ok(Some(json)) = storage.get_item(SETTINGS_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            }
        }
        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save<S: KeyValueStorage + ?Sized>(&self, storage: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|e| StorageError::Backend(e.to_string()))?;
        storage.set_item(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
