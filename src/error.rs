//! Error types for store operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::state::GameState;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Rejected request input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("score is required")]
    MissingScore,
    #[error("score must be an integer, got {0}")]
    NonNumericScore(String),
    #[error("score must not be negative, got {0}")]
    NegativeScore(i64),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The state file exists but could not be read
    #[error("state file {path:?} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The state file was read but does not hold a valid state
    #[error("state file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The new state could not be written. `pending` holds the state that was
    /// not committed; the file on disk is unchanged.
    #[error("state file {path:?} is unwritable: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
        pending: Box<GameState>,
    },

    #[error("state encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    /// State that failed to persist, if this was a write failure
    pub fn pending_state(&self) -> Option<&GameState> {
        match self {
            StoreError::Unwritable { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Take ownership of the uncommitted state, e.g. to retry the save
    pub fn into_pending_state(self) -> Option<GameState> {
        match self {
            StoreError::Unwritable { pending, .. } => Some(*pending),
            _ => None,
        }
    }
}
