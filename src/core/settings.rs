//! # Settings Persistence
//!
//! A small key-value store for values that must survive restarts, such as the
//! last selected tab. Reads are synchronous and served from memory; writes are
//! async so callers can fire them off without waiting.
//!
//! `FileSettingsStore` keeps everything in one JSON file
//! (`~/.navstack/settings.json` by default). Writes use atomic rename
//! (write `.tmp`, then `rename()`) for crash safety.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Encode(serde_json::Error),
    /// The store cannot take writes right now (poisoned lock, dead worker).
    Unavailable(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings I/O error: {e}"),
            SettingsError::Encode(e) => write!(f, "settings encoding error: {e}"),
            SettingsError::Unavailable(msg) => write!(f, "settings unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String) -> Result<(), SettingsError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Volatile store. Used when no settings file can be opened.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), SettingsError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| SettingsError::Unavailable("settings lock poisoned".to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// File store
// ============================================================================

#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default)]
    updated_at: i64,
}

#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileSettingsStore {
    /// Returns `~/.navstack/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".navstack").join("settings.json"))
    }

    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = if path.exists() {
            let json = fs::read_to_string(&path).map_err(SettingsError::Io)?;
            let file: SettingsFile = serde_json::from_str(&json).map_err(SettingsError::Encode)?;
            info!(
                "Loaded {} settings from {}",
                file.values.len(),
                path.display()
            );
            file.values
        } else {
            debug!("No settings file at {}, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self {
            path,
            cache: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), SettingsError> {
        let values = {
            let mut cache = self
                .cache
                .lock()
                .map_err(|_| SettingsError::Unavailable("settings cache poisoned".to_string()))?;
            cache.insert(key.to_string(), value);
            cache.clone()
        };
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_settings(&path, values))
            .await
            .map_err(|e| SettingsError::Unavailable(e.to_string()))?
    }
}

fn write_settings(path: &Path, values: BTreeMap<String, String>) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(SettingsError::Io)?;
    }
    let file = SettingsFile {
        values,
        updated_at: Utc::now().timestamp(),
    };
    atomic_write_json(path, &file)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SettingsError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data).map_err(SettingsError::Encode)?;
    fs::write(&tmp_path, json).map_err(SettingsError::Io)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        warn!("Failed to move settings into place: {}", e);
        SettingsError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("navstack-test-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[tokio::test]
    async fn test_memory_store_set_then_get() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get("selected_tab"), None);
        store.set("selected_tab", "hub".to_string()).await.unwrap();
        assert_eq!(store.get("selected_tab").as_deref(), Some("hub"));
    }

    #[test]
    fn test_memory_store_with_value() {
        let store = MemorySettingsStore::with_value("selected_tab", "archive");
        assert_eq!(store.get("selected_tab").as_deref(), Some("archive"));
    }

    #[tokio::test]
    async fn test_file_store_persists_across_opens() {
        let path = scratch_path();
        let store = FileSettingsStore::open(&path).unwrap();
        assert_eq!(store.get("selected_tab"), None);

        store.set("selected_tab", "device".to_string()).await.unwrap();
        assert_eq!(store.get("selected_tab").as_deref(), Some("device"));

        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get("selected_tab").as_deref(), Some("device"));
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_rejects_malformed_file() {
        let path = scratch_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FileSettingsStore::open(&path),
            Err(SettingsError::Encode(_))
        ));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_settings_file_tolerates_missing_fields() {
        let file: SettingsFile = serde_json::from_str("{}").unwrap();
        assert!(file.values.is_empty());
        assert_eq!(file.updated_at, 0);
    }
}
