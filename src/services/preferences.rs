//! Interval preference storage

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{engine::TimerConfig, error::PreferenceError};

/// Loads and saves the two interval lengths across sessions
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Result<TimerConfig, PreferenceError>;

    fn save(&self, config: &TimerConfig) -> Result<(), PreferenceError>;

    /// Load preferences, falling back to the defaults on any failure
    fn load_or_default(&self) -> TimerConfig {
        match self.load() {
            Ok(config) => config,
            Err(PreferenceError::NotFound(path)) => {
                info!("No preferences at {}, using defaults", path.display());
                TimerConfig::default()
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                TimerConfig::default()
            }
        }
    }
}

/// On-disk layout, kept compatible with preference files written by older releases
#[derive(Debug, Serialize, Deserialize)]
struct PreferencesFile {
    sit_time: u32,
    stand_time: u32,
}

impl From<&TimerConfig> for PreferencesFile {
    fn from(config: &TimerConfig) -> Self {
        Self {
            sit_time: config.sit_minutes,
            stand_time: config.stand_minutes,
        }
    }
}

impl From<PreferencesFile> for TimerConfig {
    fn from(file: PreferencesFile) -> Self {
        TimerConfig::new(file.sit_time, file.stand_time)
    }
}

/// Preferences stored as a small JSON file
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PreferenceError {
        PreferenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Result<TimerConfig, PreferenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PreferenceError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let file: PreferencesFile =
            serde_json::from_str(&contents).map_err(|source| PreferenceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!("Loaded preferences from {}", self.path.display());
        Ok(file.into())
    }

    fn save(&self, config: &TimerConfig) -> Result<(), PreferenceError> {
        let json = serde_json::to_string(&PreferencesFile::from(config))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write beside the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(
            "Saved preferences sit={}min stand={}min to {}",
            config.sit_minutes,
            config.stand_minutes,
            self.path.display()
        );
        Ok(())
    }
}

/// In-process store for ephemeral runs and tests
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    config: Mutex<Option<TimerConfig>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TimerConfig) -> Self {
        Self {
            config: Mutex::new(Some(config)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<TimerConfig, PreferenceError> {
        self.config
            .lock()
            .map_err(|e| PreferenceError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other(e.to_string()),
            })?
            .ok_or_else(|| PreferenceError::NotFound(PathBuf::from("<memory>")))
    }

    fn save(&self, config: &TimerConfig) -> Result<(), PreferenceError> {
        let mut slot = self.config.lock().map_err(|e| PreferenceError::Io {
            path: PathBuf::from("<memory>"),
            source: std::io::Error::other(e.to_string()),
        })?;
        *slot = Some(*config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_returns_same_config() {
        let dir = TempDir::new().unwrap();
        let store = JsonPreferenceStore::new(dir.path().join("preferences.json"));

        store.save(&TimerConfig::new(40, 12)).unwrap();
        assert_eq!(store.load().unwrap(), TimerConfig::new(40, 12));
    }

    #[test]
    fn reads_legacy_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"sit_time":30,"stand_time":10}"#).unwrap();

        let store = JsonPreferenceStore::new(&path);
        assert_eq!(store.load().unwrap(), TimerConfig::new(30, 10));
    }

    #[test]
    fn writes_legacy_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        JsonPreferenceStore::new(&path)
            .save(&TimerConfig::new(20, 8))
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["sit_time"], 20);
        assert_eq!(value["stand_time"], 8);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_is_not_found_and_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonPreferenceStore::new(dir.path().join("absent.json"));

        assert!(matches!(store.load(), Err(PreferenceError::NotFound(_))));
        assert_eq!(store.load_or_default(), TimerConfig::default());
    }

    #[test]
    fn corrupt_file_is_parse_error_and_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{\"sit_time\": -3}").unwrap();

        let store = JsonPreferenceStore::new(&path);
        assert!(matches!(store.load(), Err(PreferenceError::Parse { .. })));
        assert_eq!(store.load_or_default(), TimerConfig::new(25, 5));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = JsonPreferenceStore::new(dir.path().join("nested/deeper/prefs.json"));
        store.save(&TimerConfig::new(1, 1)).unwrap();
        assert_eq!(store.load().unwrap(), TimerConfig::new(1, 1));
    }

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryPreferenceStore::new();
        assert!(matches!(store.load(), Err(PreferenceError::NotFound(_))));
        store.save(&TimerConfig::new(7, 3)).unwrap();
        assert_eq!(store.load().unwrap(), TimerConfig::new(7, 3));
    }
}
