//! Request bodies as sent by the game client
//!
//! Fields stay loosely typed (`serde_json::Value`) so that a wrong type is
//! reported as a validation failure instead of a decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Body of a "record score" request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ScoreSubmission {
    pub fn new(score: impl Into<Value>, name: Option<&str>) -> Self {
        Self {
            score: Some(score.into()),
            name: name.map(str::to_string),
        }
    }

    /// Parse a textual score, e.g. a command-line argument
    pub fn from_text(score: &str, name: Option<&str>) -> Self {
        let score = match score.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::from(score),
        };
        Self::new(score, name)
    }

    /// Validated, non-negative integer score
    pub fn score(&self) -> Result<u64, ValidationError> {
        match &self.score {
            None | Some(Value::Null) => Err(ValidationError::MissingScore),
            Some(Value::Number(n)) => {
                if let Some(score) = n.as_u64() {
                    Ok(score)
                } else if let Some(negative) = n.as_i64() {
                    Err(ValidationError::NegativeScore(negative))
                } else {
                    Err(ValidationError::NonNumericScore(n.to_string()))
                }
            }
            Some(other) => Err(ValidationError::NonNumericScore(other.to_string())),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Body of a "set speed" request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedSubmission {
    #[serde(default)]
    pub speed: Option<Value>,
}

impl SpeedSubmission {
    pub fn new(speed: impl Into<Value>) -> Self {
        Self {
            speed: Some(speed.into()),
        }
    }

    /// Requested level, if it is an integer at all. Range is checked later.
    pub fn speed(&self) -> Option<i64> {
        self.speed.as_ref().and_then(Value::as_i64)
    }
}
