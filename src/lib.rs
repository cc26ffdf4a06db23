//! Snake Store - shared speed setting and leaderboard for the snake game
//!
//! Core modules:
//! - `store`: Locked load → mutate → save boundary used by every request
//! - `state`: The persisted aggregate and its pure mutations
//! - `highscores`: Ranked, bounded leaderboard
//! - `persistence`: Atomic JSON file storage
//! - `platform`: Clock abstraction

pub mod config;
pub mod error;
pub mod highscores;
pub mod names;
pub mod persistence;
pub mod platform;
pub mod request;
pub mod settings;
pub mod state;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError, ValidationError};
pub use highscores::{HighScores, ScoreEntry};
pub use request::{ScoreSubmission, SpeedSubmission};
pub use settings::Speed;
pub use state::GameState;
pub use store::StateStore;

/// Store configuration constants
pub mod consts {
    /// Leaderboard window size
    pub const MAX_HIGH_SCORES: usize = 10;

    /// Speed bounds (inclusive)
    pub const MIN_SPEED: u8 = 1;
    pub const MAX_SPEED: u8 = 10;
    pub const DEFAULT_SPEED: u8 = 5;

    /// State file used when nothing else is configured
    pub const DEFAULT_STATE_FILE: &str = "snake_config.json";
    /// Environment variable overriding the state file location
    pub const STATE_PATH_ENV: &str = "SNAKE_STORE_PATH";
}
