//! Store configuration

use std::env;
use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_STATE_FILE, STATE_PATH_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// JSON file holding the shared state
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Explicit path first, then `SNAKE_STORE_PATH`, then the default file
    pub fn resolve(explicit: Option<&Path>) -> Self {
        Self::resolve_with(explicit, env::var_os(STATE_PATH_ENV).map(PathBuf::from))
    }

    fn resolve_with(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        match from_env {
            Some(path) if !path.as_os_str().is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }
}
