//! File-backed storage for [`GameState`]

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};
use crate::state::GameState;

/// Suffix given to a state file that failed to parse
pub const CORRUPT_SUFFIX: &str = ".corrupt";

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored state. `Ok(None)` means no file exists yet.
    ///
    /// Contents that are not a valid state (bad JSON, bad UTF-8) are
    /// `Corrupt`; failing to read the file at all is `Unreadable`.
    pub fn read(&self) -> Result<Option<GameState>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Unreadable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let state: GameState =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            "Loaded state from {:?} ({} high scores)",
            self.path,
            state.highscores.len()
        );
        Ok(Some(state))
    }

    /// Replace the stored state in one step. Readers see either the old file
    /// or the new one, never a partial write.
    pub fn write(&self, state: &GameState) -> Result<()> {
        let json = serde_json::to_vec(state)?;

        let unwritable = |source: io::Error| StoreError::Unwritable {
            path: self.path.clone(),
            source,
            pending: Box::new(state.clone()),
        };

        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(unwritable)?;
        tmp.write_all(&json).map_err(unwritable)?;
        tmp.as_file().sync_all().map_err(unwritable)?;
        tmp.persist(&self.path).map_err(|e| unwritable(e.error))?;

        info!(
            "State saved to {:?} (speed {}, {} high scores)",
            self.path,
            state.speed,
            state.highscores.len()
        );
        Ok(())
    }

    /// Move the current file to `<file>.corrupt`, replacing any older copy
    pub fn quarantine(&self) -> io::Result<PathBuf> {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(CORRUPT_SUFFIX);
        let target = PathBuf::from(name);
        fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}
