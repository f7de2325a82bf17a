use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const NOTES_KEY: &str = "notes";
pub const DAILY_NOTES_KEY: &str = "daily_notes";
pub const TASKS_KEY: &str = "tasks";
pub const LINKS_KEY: &str = "links";
pub const ACTIVE_NOTE_KEY: &str = "active_note";

const ALL_KEYS: [&str; 5] = [
    NOTES_KEY,
    DAILY_NOTES_KEY,
    TASKS_KEY,
    LINKS_KEY,
    ACTIVE_NOTE_KEY,
];

/// Capability port for the durable key-value store. The workspace never
/// touches the filesystem directly; it goes through one of the two
/// implementations selected at startup.
pub trait StorageBackend {
    fn read_blob(&self, key: &str) -> Option<String>;
    fn write_blob(&self, key: &str, json: &str) -> Result<()>;
    fn erase_blob(&self, key: &str) -> Result<()>;
}

/// Real backing store: one JSON file per collection key under the user's
/// data directory.
#[derive(Debug)]
pub struct DiskBackend {
    data_dir: PathBuf,
}

impl DiskBackend {
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Failed to get data directory")?
            .join("oreganote");
        Self::from_dir(&data_dir)
    }

    pub fn from_dir(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self {
            data_dir: dir.to_path_buf(),
        })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for DiskBackend {
    fn read_blob(&self, key: &str) -> Option<String> {
        let path = self.blob_path(key);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_blob(&self, key: &str, json: &str) -> Result<()> {
        let path = self.blob_path(key);
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn erase_blob(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// No-op store for contexts without durable storage: reads yield defaults,
/// writes are discarded.
#[derive(Debug, Default)]
pub struct NullBackend;

impl StorageBackend for NullBackend {
    fn read_blob(&self, _key: &str) -> Option<String> {
        None
    }

    fn write_blob(&self, _key: &str, _json: &str) -> Result<()> {
        Ok(())
    }

    fn erase_blob(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// Typed read/write of whole collections against a backend. Persistence is
/// best-effort: a failed read degrades to the caller's default and a failed
/// write is logged without rolling back in-memory state.
pub struct StorageManager {
    backend: Box<dyn StorageBackend>,
}

impl StorageManager {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn disk() -> Result<Self> {
        Ok(Self::new(Box::new(DiskBackend::new()?)))
    }

    pub fn null() -> Self {
        Self::new(Box::new(NullBackend))
    }

    /// Reads the collection stored under `key`, falling back to `default`
    /// when the key is absent or its contents fail to parse.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.backend.read_blob(key) else {
            return default;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding unparseable data under '{}': {}", key, e);
                default
            }
        }
    }

    /// Overwrites the collection stored under `key` with `value`.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize '{}': {}", key, e);
                return;
            }
        };
        if let Err(e) = self.backend.write_blob(key, &json) {
            error!("Failed to persist '{}': {}", key, e);
        } else {
            debug!("Persisted '{}'", key);
        }
    }

    pub fn erase(&self, key: &str) {
        if let Err(e) = self.backend.erase_blob(key) {
            error!("Failed to erase '{}': {}", key, e);
        }
    }

    /// Erases every workspace key. Used by "new project".
    pub fn erase_all(&self) {
        for key in ALL_KEYS {
            self.erase(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::models::{SavedNote, Task};

    #[test]
    fn missing_key_yields_default() {
        let dir = tempdir().expect("tempdir");
        let store =
            StorageManager::new(Box::new(DiskBackend::from_dir(dir.path()).expect("backend")));
        let tasks: Vec<Task> = store.read(TASKS_KEY, Vec::new());
        assert!(tasks.is_empty());
    }

    #[test]
    fn round_trips_a_collection() {
        let dir = tempdir().expect("tempdir");
        let store =
            StorageManager::new(Box::new(DiskBackend::from_dir(dir.path()).expect("backend")));
        let tasks = vec![Task::new("Buy milk".to_string())];
        store.write(TASKS_KEY, &tasks);

        let loaded: Vec<Task> = store.read(TASKS_KEY, Vec::new());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "Buy milk");
        assert!(!loaded[0].completed);
    }

    #[test]
    fn corrupt_blob_degrades_to_default() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("tasks.json"), "{not json").expect("write");
        let store =
            StorageManager::new(Box::new(DiskBackend::from_dir(dir.path()).expect("backend")));
        let tasks: Vec<Task> = store.read(TASKS_KEY, Vec::new());
        assert!(tasks.is_empty());
    }

    #[test]
    fn null_backend_discards_writes() {
        let store = StorageManager::null();
        let tasks = vec![Task::new("ephemeral".to_string())];
        store.write(TASKS_KEY, &tasks);
        let loaded: Vec<Task> = store.read(TASKS_KEY, Vec::new());
        assert!(loaded.is_empty());
    }

    #[test]
    fn erase_all_removes_every_key() {
        let dir = tempdir().expect("tempdir");
        let store =
            StorageManager::new(Box::new(DiskBackend::from_dir(dir.path()).expect("backend")));
        store.write(NOTES_KEY, &Vec::<SavedNote>::new());
        store.write(TASKS_KEY, &Vec::<Task>::new());
        store.erase_all();
        assert!(!dir.path().join("notes.json").exists());
        assert!(!dir.path().join("tasks.json").exists());
    }
}
