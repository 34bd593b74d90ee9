use serde::{Deserialize, Serialize};

/// Remaining whole seconds per side
///
/// Values may reach zero or go negative; the first tick that does so ends
/// the game on time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub white: i64,
    pub black: i64,
}

/// Final result pushed to every client when the game ends
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameOverPayload {
    /// `"White"`, `"Black"` or `"Draw"`
    pub winner: String,
    /// `checkmate`, `stalemate`, `insufficient_material`, `seventyfive_moves`,
    /// `fivefold_repetition` or `timeout`
    pub reason: String,
    /// Present only when the AI side was checkmated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_surrender: Option<bool>,
}

/// Client → Server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Move {
        #[serde(rename = "move")]
        uci: String,
    },
    ClockTick,
    ResetGame,
}

/// Server → Client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Board as FEN
    UpdateBoard(String),
    UpdateClock(ClockSnapshot),
    StrategySuggestion(String),
    GameOver(GameOverPayload),
    /// Sent only to the client whose move was refused
    MoveRejected {
        #[serde(rename = "move")]
        uci: String,
        reason: String,
    },
}
