use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::errors::{AppError, AppResult};

/// Application-scoped string slots. Implementations guarantee single-writer
/// consistency and nothing more.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|_| AppError::Storage("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|_| AppError::Storage("in-memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.write()?.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten whole on every mutation.
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> AppResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Entries to mutate, and whether an unreadable file was discarded to get
    /// them. Writes replace a corrupt file instead of failing on it.
    fn load_for_write(&self) -> AppResult<(HashMap<String, String>, bool)> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(AppError::Serialization(err)) => {
                log::warn!(
                    "Discarding unreadable store file {}: {}",
                    self.path.display(),
                    err
                );
                Ok((HashMap::new(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Readers only ever see a complete file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn poisoned() -> AppError {
        AppError::Storage("file store lock poisoned".to_string())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.lock.read().map_err(|_| Self::poisoned())?;
        Ok(self.load()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock.write().map_err(|_| Self::poisoned())?;
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)?;
        log::debug!("Stored key '{}' in {}", key, self.path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.write().map_err(|_| Self::poisoned())?;
        let (mut entries, discarded) = self.load_for_write()?;
        if entries.remove(key).is_some() || discarded {
            self.persist(&entries)?;
            log::debug!("Removed key '{}' from {}", key, self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stores_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryKeyValueStore>();
        assert_send_sync::<FileKeyValueStore>();
    }

    #[test]
    fn test_in_memory_put_get_remove() {
        let store = InMemoryKeyValueStore::new();

        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", "v1").unwrap();
        store.put("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("absent.json"));

        assert_eq!(store.get("anything").unwrap(), None);
        store.remove("anything").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        FileKeyValueStore::new(&path).put("quiz", "[1,2]").unwrap();
        FileKeyValueStore::new(&path).put("other", "x").unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get("quiz").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));

        reopened.remove("quiz").unwrap();
        assert_eq!(FileKeyValueStore::new(&path).get("quiz").unwrap(), None);
    }

    #[test]
    fn test_file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let err = FileKeyValueStore::new(&path).get("quiz").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_file_store_overwrites_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ truncated").unwrap();
        let store = FileKeyValueStore::new(&path);

        store.remove("quiz").unwrap();
        assert_eq!(store.get("quiz").unwrap(), None);

        fs::write(&path, "{ truncated").unwrap();
        store.put("quiz", "[]").unwrap();
        assert_eq!(store.get("quiz").unwrap().as_deref(), Some("[]"));
    }
}
