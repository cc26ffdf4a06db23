//! Persisted game state and its mutations
//!
//! Mutations are pure: they consume a state and return the next one. Reading
//! and writing the file is the store's job.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::highscores::{HighScores, ScoreEntry};
use crate::names::NamePicker;
use crate::platform::Clock;
use crate::settings::Speed;

/// Complete shared state (speed + leaderboard)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawGameState")]
pub struct GameState {
    pub speed: Speed,
    pub highscores: HighScores,
}

/// On-disk shape before invariants are enforced
#[derive(Deserialize)]
struct RawGameState {
    speed: i64,
    highscores: Vec<ScoreEntry>,
}

impl From<RawGameState> for GameState {
    fn from(raw: RawGameState) -> Self {
        let speed = Speed::new(raw.speed).unwrap_or_else(|| {
            warn!("Stored speed {} out of range, using default", raw.speed);
            Speed::default()
        });

        let stored = raw.highscores.len();
        let (highscores, repaired) = HighScores::from_entries(raw.highscores);
        if repaired {
            warn!(
                "Stored leaderboard out of order or oversized ({stored} entries), kept {}",
                highscores.len()
            );
        }

        Self { speed, highscores }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a score to the leaderboard.
    ///
    /// `score` is `None` when the request carried no usable score. Blank names
    /// are replaced with a default one.
    pub fn record_score(
        mut self,
        score: Option<u64>,
        name: Option<&str>,
        clock: &dyn Clock,
        names: &mut NamePicker,
    ) -> Result<Self> {
        let score = score.ok_or(ValidationError::MissingScore)?;
        let entry = ScoreEntry {
            score,
            timestamp: clock.now(),
            name: names.resolve(name),
        };
        self.highscores.add_score(entry);
        Ok(self)
    }

    /// Change the speed. Absent or out-of-range values leave the state as is.
    pub fn set_speed(mut self, speed: Option<i64>) -> Self {
        if let Some(speed) = speed.and_then(Speed::new) {
            self.speed = speed;
        }
        self
    }
}
