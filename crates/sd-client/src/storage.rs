//! Durable client storage.
//!
//! A small string key-value store that survives process restarts. The
//! session store is its only writer; the interceptor may read the
//! credential key directly when the store holds no token in memory.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::error::{StorageError, StorageResult};

/// Key holding the bearer credential as a plain string.
pub const TOKEN_KEY: &str = "token";

/// Key holding the serialized session snapshot.
pub const SESSION_KEY: &str = "session";

/// Durable key-value storage adapter.
pub trait DurableStorage: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Removes every value.
    fn clear(&self) -> StorageResult<()>;
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Storage backed by a single JSON object file.
///
/// The file is re-read on every access so that separate processes sharing
/// it (one `sd` invocation after another) observe each other's writes.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Creates storage backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Storage at the default location (`~/.shelfdesk/session.json`).
    pub fn at_default_location() -> StorageResult<Self> {
        Self::default_path().map(Self::new)
    }

    /// Gets the default storage file path.
    pub fn default_path() -> StorageResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            StorageError::Unavailable("could not determine home directory".to_string())
        })?;
        Ok(home.join(".shelfdesk").join("session.json"))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StorageError::Format(format!("{}: {e}", self.path.display())))
    }

    /// Reads the map for a modification, starting over if the file is unreadable.
    fn read_map_for_update(&self) -> StorageResult<BTreeMap<String, String>> {
        match self.read_map() {
            Err(StorageError::Format(reason)) => {
                tracing::warn!(%reason, "replacing unreadable storage file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        if map.is_empty() {
            return self.remove_file();
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Format(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    fn remove_file(&self) -> StorageResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map_for_update()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map_for_update()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        self.remove_file()
    }
}

/// Limits the credential file to its owner.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> StorageResult<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> StorageResult<()> {
    Ok(())
}
