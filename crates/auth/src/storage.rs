//! Durable key-value storage for the session record.
//!
//! Two independent string keys survive restarts: the serialized user and the
//! role name. Implementations must make a `set`/`remove` visible to the next
//! `get` as soon as the call returns; there is no write queue.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::StorageError;

/// Key holding the JSON-serialized signed-in user.
pub const USER_KEY: &str = "forsee_user";

/// Key holding the committed role name.
pub const ROLE_KEY: &str = "forsee_role";

/// Local key-value store abstraction (browser-local-storage semantics).
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON-file-backed store.
///
/// The whole map is rewritten on every mutation through a temp file in the
/// same directory, then renamed over the target, so a crash never leaves a
/// half-written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A file that is not a JSON object of strings is reported as a parse error;
    /// callers decide whether to start over.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
                key: "<file>",
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened file store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let encoded = serde_json::to_vec_pretty(entries).map_err(StorageError::Encode)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&encoded)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get(ROLE_KEY).unwrap(), None);

        store.set(ROLE_KEY, "viewer").unwrap();
        assert_eq!(store.get(ROLE_KEY).unwrap().as_deref(), Some("viewer"));

        store.remove(ROLE_KEY).unwrap();
        store.remove(ROLE_KEY).unwrap();
        assert_eq!(store.get(ROLE_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set(USER_KEY, r#"{"name":"x"}"#).unwrap();
        store.set(ROLE_KEY, "admin").unwrap();
        store.remove(ROLE_KEY).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(USER_KEY).unwrap().as_deref(), Some(r#"{"name":"x"}"#));
        assert_eq!(reopened.get(ROLE_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_rejects_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
    }

    #[test]
    fn missing_or_empty_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(missing.get(USER_KEY).unwrap(), None);

        let empty_path = dir.path().join("empty.json");
        fs::write(&empty_path, "").unwrap();
        let empty = FileStore::open(&empty_path).unwrap();
        assert_eq!(empty.get(USER_KEY).unwrap(), None);
    }
}
