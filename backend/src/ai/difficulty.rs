//! AI difficulty levels
//!
//! Difficulty only changes the persona instruction sent to the move oracle.
//! It never changes how moves are validated or applied.
//!
//! | Difficulty | Persona      | Wire name  |
//! |------------|--------------|------------|
//! | Easy       | Beginner     | `"easy"`   |
//! | Medium     | Intermediate | `"medium"` |
//! | Hard       | Expert       | `"hard"`   |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// AI difficulty tier
///
/// Process-wide and mutable at any time through `POST /set_difficulty`. The
/// tier in effect when an AI turn starts is the one used for that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIDifficulty {
    /// Beginner persona, not trying hard to win
    Easy,

    /// Intermediate persona, occasional mistakes allowed
    #[default]
    Medium,

    /// Expert persona, best possible move
    Hard,
}

/// Difficulty name outside the three accepted values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown difficulty level: {0:?}")]
pub struct UnknownDifficulty(pub String);

impl AIDifficulty {
    pub const ALL: [AIDifficulty; 3] = [AIDifficulty::Easy, AIDifficulty::Medium, AIDifficulty::Hard];

    /// Wire name (`easy`, `medium`, `hard`)
    pub fn as_str(self) -> &'static str {
        match self {
            AIDifficulty::Easy => "easy",
            AIDifficulty::Medium => "medium",
            AIDifficulty::Hard => "hard",
        }
    }

    /// Persona instruction appended to the oracle's system prompt
    pub fn persona_prompt(self) -> &'static str {
        match self {
            AIDifficulty::Easy => {
                "You are a beginner chess player. Make a valid move, but don't try too hard to win."
            }
            AIDifficulty::Medium => {
                "You are an intermediate chess player. Make a reasonable move, but occasional mistakes are okay."
            }
            AIDifficulty::Hard => {
                "You are an expert chess player. Make the best possible move to win the game."
            }
        }
    }
}

impl fmt::Display for AIDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AIDifficulty {
    type Err = UnknownDifficulty;

    /// Exact, case-sensitive match on the wire names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AIDifficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}
