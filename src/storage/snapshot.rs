// src/storage/snapshot.rs
//! JSON snapshot persistence for the registry store.
//!
//! The whole store is written as one compact JSON document. Writes go to a
//! sibling temporary file that is renamed over the target, so a reader never
//! sees a half-written snapshot.

use crate::utils::serialization::{deserialize, serialize};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("snapshot {path} is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed snapshot location.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, or `None` if the file does not exist yet.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let snapshot = deserialize(&raw).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("loaded snapshot from {}", self.path.display());
        Ok(Some(snapshot))
    }

    pub fn save<T: Serialize>(&self, snapshot: &T) -> Result<(), StorageError> {
        let json = serialize(snapshot).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        log::debug!("wrote snapshot to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
