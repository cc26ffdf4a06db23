//! High score leaderboard
//!
//! Keeps the top [`MAX_HIGH_SCORES`] entries, best first. Entries with equal
//! scores keep the order they were recorded in.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

pub use crate::consts::MAX_HIGH_SCORES;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player's score
    pub score: u64,
    /// Unix timestamp (seconds) when recorded
    pub timestamp: i64,
    /// Display name
    pub name: String,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

/// Leaderboard row prepared for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    pub score: u64,
    pub timestamp: String,
    pub name: String,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a leaderboard from arbitrary entries, ranking and trimming them.
    /// The flag is true when the entries needed repair.
    pub fn from_entries(entries: Vec<ScoreEntry>) -> (Self, bool) {
        let mut scores = Self { entries };
        let repaired = scores.normalize();
        (scores, repaired)
    }

    /// Check if a score would make it onto the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Ties with the lowest entry rank after it and fall off
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry to the leaderboard.
    /// Returns the rank achieved (1-indexed) or None if it fell off the window.
    pub fn add_score(&mut self, entry: ScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Insert after every entry with an equal or higher score
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Restore ordering and capacity. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let sorted = self.is_sorted();
        if !sorted {
            // Stable: equal scores keep their stored order
            self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        }
        let overflow = self.entries.len() > MAX_HIGH_SCORES;
        self.entries.truncate(MAX_HIGH_SCORES);
        !sorted || overflow
    }

    fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].score >= w[1].score)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Rows with timestamps rendered in local time
    pub fn display_rows(&self) -> Vec<DisplayEntry> {
        self.entries
            .iter()
            .map(|e| DisplayEntry {
                score: e.score,
                timestamp: format_timestamp(e.timestamp),
                name: e.name.clone(),
            })
            .collect()
    }
}

/// Format a Unix timestamp (seconds) as local `YYYY-MM-DD HH:MM`
pub fn format_timestamp(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).earliest() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}
