//! Error types for the game server
//!
//! `GameError` covers refusals by the game session; `ApiError` is what the
//! HTTP layer turns into a response.

use crate::api::StatusResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chess_logic_shared::MoveError;
use thiserror::Error;

/// Errors that can occur in game logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Malformed or illegal move; nothing was changed
    #[error(transparent)]
    InvalidMove(#[from] MoveError),

    /// The AI side owns the turn and its move is still pending
    #[error("It is the AI's turn; wait for its move")]
    AiThinking,

    /// No moves are accepted until the game is reset
    #[error("The game is over; reset to play again")]
    GameOver,

    /// AI move computed for a game that has since been reset
    #[error("AI move belongs to a superseded turn")]
    StaleAiTurn,
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid difficulty level")]
    InvalidDifficulty,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidDifficulty => StatusCode::BAD_REQUEST,
        };
        (status, Json(StatusResponse::error(self.to_string()))).into_response()
    }
}
