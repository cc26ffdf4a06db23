//! Game speed setting
//!
//! Consumed by the game client to pace the snake. Only values inside
//! [`MIN_SPEED`, `MAX_SPEED`] can be constructed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};

/// Speed level (1 = slowest, 10 = fastest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(MIN_SPEED);
    pub const MAX: Speed = Speed(MAX_SPEED);

    /// Returns `None` when `level` is outside the valid range
    pub fn new(level: i64) -> Option<Self> {
        if (MIN_SPEED as i64..=MAX_SPEED as i64).contains(&level) {
            Some(Speed(level as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(DEFAULT_SPEED)
    }
}

impl TryFrom<i64> for Speed {
    type Error = String;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Speed::new(level)
            .ok_or_else(|| format!("speed {level} outside {MIN_SPEED}..={MAX_SPEED}"))
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> u8 {
        speed.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
