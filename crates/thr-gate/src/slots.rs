//! String key/value slots backing the hint store and the token identification.
//!
//! Slots are the process-local analog of same-origin browser storage: a few
//! named string values that survive one round-trip. They are not synchronized
//! across processes.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::GateError;

pub trait Slots: Send + Sync {
    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, GateError>;

    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), GateError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), GateError>;

    /// Read a value and remove it.
    ///
    /// # Errors
    ///
    /// Returns `GateError::HintStore` if either step fails.
    fn take(&self, key: &str) -> Result<Option<String>, GateError> {
        let value = self.get(key)?;
        if value.is_some() {
            self.remove(key)?;
        }
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// MemorySlots
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemorySlots {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySlots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Slots for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>, GateError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GateError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), GateError> {
        self.values().remove(key);
        Ok(())
    }

    fn take(&self, key: &str) -> Result<Option<String>, GateError> {
        Ok(self.values().remove(key))
    }
}

// ---------------------------------------------------------------------------
// FileSlots
// ---------------------------------------------------------------------------

/// One file per key under a directory. Files are written with mode 0600 and
/// the directory with 0700 on Unix.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, GateError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GateError::HintStore(format!("invalid slot key '{key}'")));
        }
        Ok(self.dir.join(key))
    }

    fn ensure_dir(&self) -> Result<(), GateError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| GateError::HintStore(format!("mkdir {}: {e}", self.dir.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", self.dir.display());
            }
        }
        Ok(())
    }
}

impl Slots for FileSlots {
    fn get(&self, key: &str) -> Result<Option<String>, GateError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GateError::HintStore(format!("read {}: {e}", path.display()))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GateError> {
        let path = self.path_for(key)?;
        self.ensure_dir()?;
        fs::write(&path, value)
            .map_err(|e| GateError::HintStore(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .map_err(|e| GateError::HintStore(format!("chmod {}: {e}", path.display())))?;
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), GateError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GateError::HintStore(format!("delete {}: {e}", path.display()))),
        }
    }
}
