//! Persistent key-value storage for client state.
//!
//! State survives restarts as serialized JSON strings under fixed keys (see
//! [`keys`]). Reading is forgiving: a missing key or an entry that no longer
//! parses yields the type's default. Writing is best-effort: failures are
//! logged and never interrupt the operation that triggered them.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys, one per persisted container.
pub mod keys {
    /// Products without images, plus the search query.
    pub const PRODUCTS: &str = "productsState";
    /// Product id to image map, kept apart from the product list.
    pub const PRODUCT_IMAGES: &str = "productImages";
    pub const CART: &str = "cartState";
    pub const THEME: &str = "theme";
    pub const AUTH: &str = "auth";
    pub const USERS: &str = "users";
    /// Contact messages that could not be delivered to the API.
    pub const PENDING_CONTACTS: &str = "pendingContacts";
}

/// Errors from the underlying store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A synchronous string key-value store.
pub trait KeyValueStore: Send {
    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Store held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store with raw entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as one JSON document on disk.
///
/// The whole document is rewritten on every `set` by replacing the file,
/// never by truncating it in place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts empty. A file that does not hold a JSON object
    /// of strings is logged and replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the parent directory cannot be created or
    /// the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed state file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file each flush is staged in before replacing the store.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    // Stage then rename, so a crash mid-write leaves the previous document intact.
    fn flush(&self) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(&self.entries)?;
        let staging = self.staging_path();
        fs::write(&staging, data).map_err(|source| StorageError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

/// Typed, failure-tolerant access to a [`KeyValueStore`].
pub struct Storage {
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Storage backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Load the value under `key`, or `T::default()` if it is missing or
    /// cannot be parsed.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.try_load(key).unwrap_or_default()
    }

    /// Load the value under `key` if present and well-formed.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read persisted state");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding malformed persisted state");
                None
            }
        }
    }

    /// Serialize and store `value` under `key`. Failures are logged only.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(key, raw));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "Failed to persist state");
        }
    }
}
