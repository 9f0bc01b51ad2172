//! # Persistence Module
//!
//! The durable string-keyed store a world saves into.
//!
//! A [`World`](crate::voxels::world::World) writes two entries: the generation
//! parameters and the edit overlay, both as JSON text. Any backend that can
//! hold strings by key can implement [`KeyValueStore`]; two are bundled:
//!
//! * [`MemoryStore`] - a `HashMap`, for tests and embedding
//! * [`FileStore`] - one `<key>.json` file per entry inside a directory

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::PersistenceError;

/// Store key holding the serialized [`WorldParams`](crate::config::WorldParams).
pub const PARAMS_KEY: &str = "world_params";
/// Store key holding the serialized edit overlay.
pub const EDITS_KEY: &str = "world_edits";

/// A durable string-keyed store.
pub trait KeyValueStore {
    /// Reads the value under `key`, `Ok(None)` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// An in-memory [`KeyValueStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// A [`KeyValueStore`] backed by a directory, one file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(FileStore { root })
    }

    /// The directory holding the entries.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        // Write then rename so a crash never leaves a half-written entry.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
