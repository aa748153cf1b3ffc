//! JSON file stores for the rules document and notification state,
//! plus the single-instance lock.

use caucion_core::{NotificationState, RulesConfig, StoredEntry};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("rules file not found: {0}")]
    RulesMissing(PathBuf),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("another instance holds the lock: {0}")]
    Locked(PathBuf),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn parse(path: &Path, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The operator-edited rules document on disk.
#[derive(Debug, Clone)]
pub struct RulesStore {
    path: PathBuf,
}

impl RulesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file is a configuration error, not
    /// an empty default.
    pub fn load(&self) -> Result<RulesConfig, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::RulesMissing(self.path.clone()));
        }
        let raw =
            fs::read_to_string(&self.path).map_err(|source| StoreError::io(&self.path, source))?;
        serde_json::from_str(&raw).map_err(|source| StoreError::parse(&self.path, source))
    }

    /// Persist the document, pretty-printed for hand editing.
    pub fn save(&self, config: &RulesConfig) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(config)
            .map_err(|source| StoreError::parse(&self.path, source))?;
        fs::write(&self.path, raw).map_err(|source| StoreError::io(&self.path, source))?;
        debug!("Saved rules document to {:?}", self.path);
        Ok(())
    }
}

/// The notification state file. Absent on first run.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state map, normalizing legacy bare-number entries.
    pub fn load(&self) -> Result<NotificationState, StoreError> {
        if !self.path.exists() {
            debug!("No state file at {:?}, starting empty", self.path);
            return Ok(NotificationState::new());
        }
        let raw =
            fs::read_to_string(&self.path).map_err(|source| StoreError::io(&self.path, source))?;
        let stored: BTreeMap<String, StoredEntry> =
            serde_json::from_str(&raw).map_err(|source| StoreError::parse(&self.path, source))?;
        Ok(NotificationState::from_stored(stored))
    }

    /// Write the state back only if something changed since load.
    /// Returns whether a write happened.
    pub fn save_if_dirty(&self, state: &mut NotificationState) -> Result<bool, StoreError> {
        if !state.is_dirty() {
            return Ok(false);
        }
        let raw = serde_json::to_string_pretty(state.entries())
            .map_err(|source| StoreError::parse(&self.path, source))?;
        fs::write(&self.path, raw).map_err(|source| StoreError::io(&self.path, source))?;
        state.mark_clean();
        debug!(keys = state.len(), "Saved notification state to {:?}", self.path);
        Ok(true)
    }
}

/// Exclusive run lock backed by a lock file. Creation fails when the
/// file already exists; dropping the guard removes it.
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::Locked(path))
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        if let Err(err) = writeln!(file, "{}", std::process::id()) {
            warn!(error = %err, "Could not write pid into lock file");
        }
        debug!("Acquired instance lock at {:?}", path);
        Ok(Self { path })
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(error = %err, "Could not remove lock file {:?}", self.path);
        }
    }
}
