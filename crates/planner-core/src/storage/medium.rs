//! Backing media for the persisted store.
//!
//! The desktop build keeps the record in a pretty-printed `db.json`; the
//! hosted build keeps it under a single storage key. Both reduce to "read the
//! whole record" / "overwrite the whole record".

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// Key of the record in key-value (browser-style) storage.
pub const STORAGE_KEY: &str = "student_planner_db";

pub trait StorageMedium: Send {
    /// Human-readable description used in logs and errors.
    fn describe(&self) -> String;

    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StoreError>;

    fn write(&self, contents: &str) -> Result<(), StoreError>;
}

/// A JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageMedium for FileMedium {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::ReadFailed {
                medium: self.describe(),
                source,
            }),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        std::fs::write(&self.path, contents).map_err(|source| StoreError::WriteFailed {
            medium: self.describe(),
            source,
        })
    }
}

/// A single in-process storage slot keyed by [`STORAGE_KEY`].
///
/// Clones share the slot, so a test (or the hosted front end) can hand one
/// clone to the store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StorageMedium for MemoryMedium {
    fn describe(&self) -> String {
        format!("storage key '{STORAGE_KEY}'")
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        let guard = self.slot.lock().map_err(|_| StoreError::ReadFailed {
            medium: self.describe(),
            source: std::io::Error::other("storage slot poisoned"),
        })?;
        Ok(guard.clone())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        let mut guard = self.slot.lock().map_err(|_| StoreError::WriteFailed {
            medium: self.describe(),
            source: std::io::Error::other("storage slot poisoned"),
        })?;
        *guard = Some(contents.to_string());
        Ok(())
    }
}
