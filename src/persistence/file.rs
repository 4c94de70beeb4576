//! TOML file backend.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::MotorDefaults;
use crate::error::PersistenceError;

use super::{decode_record, encode_record, LoadedState, PersistedState, StateStore};

/// Record stored as a small TOML file.
///
/// Each save writes its own uniquely named temporary file next to the
/// record, syncs it and renames it over the record. An interrupted or
/// concurrent save leaves a complete record in place.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
    defaults: MotorDefaults,
}

impl FileStateStore {
    /// Store at `path`, falling back to `defaults` on read.
    pub fn new<P: Into<PathBuf>>(path: P, defaults: MotorDefaults) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    /// Record path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn write_err(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> LoadedState {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let loaded = decode_record(&content, &self.defaults);
                info!(
                    path = %self.path.display(),
                    position = loaded.state.position,
                    max_limit = loaded.state.max_limit,
                    steps_per_rot = loaded.state.steps_per_rot,
                    speed = loaded.state.speed,
                    "State loaded"
                );
                loaded
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "State file not found, using defaults");
                LoadedState::defaults(&self.defaults)
            }
            Err(source) => {
                let e = PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                };
                warn!("{e}; using defaults");
                LoadedState::defaults(&self.defaults)
            }
        }
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        let text = encode_record(state)?;
        let mut tmp = NamedTempFile::new_in(self.directory()).map_err(|e| self.write_err(e))?;
        tmp.write_all(text.as_bytes()).map_err(|e| self.write_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_err(e))?;

        tmp.persist(&self.path).map_err(|e| self.write_err(e.error))?;
        debug!(path = %self.path.display(), ?state, "State saved");
        Ok(())
    }
}
