//! Game over state tracking and result management
//!
//! # Game Over Conditions
//!
//! ## Checkmate
//! - **WhiteWins**: Black is in check with no legal moves
//! - **BlackWins**: White is in check with no legal moves
//!
//! ## Draw Conditions
//! - Stalemate, insufficient material, seventy-five-move rule, fivefold repetition
//!
//! ## Time Control
//! - **Timeout(side)**: `side` ran out of time, the other side wins
//!
//! All results are terminal: no move is accepted until the game is reset.

use chess_logic_shared::{Color, Termination};
use shared::GameOverPayload;

/// Why a drawn game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

/// How the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverResult {
    /// White won by checkmate
    WhiteWins,
    /// Black won by checkmate
    BlackWins,
    Draw(DrawReason),
    /// The named side's clock reached zero
    Timeout(Color),
}

impl From<Termination> for GameOverResult {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Checkmate {
                winner: Color::White,
            } => GameOverResult::WhiteWins,
            Termination::Checkmate {
                winner: Color::Black,
            } => GameOverResult::BlackWins,
            Termination::Stalemate => GameOverResult::Draw(DrawReason::Stalemate),
            Termination::InsufficientMaterial => {
                GameOverResult::Draw(DrawReason::InsufficientMaterial)
            }
            Termination::SeventyFiveMoves => GameOverResult::Draw(DrawReason::SeventyFiveMoves),
            Termination::FivefoldRepetition => {
                GameOverResult::Draw(DrawReason::FivefoldRepetition)
            }
        }
    }
}

impl GameOverResult {
    /// The winning side, `None` for draws
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOverResult::WhiteWins => Some(Color::White),
            GameOverResult::BlackWins => Some(Color::Black),
            GameOverResult::Draw(_) => None,
            GameOverResult::Timeout(flagged) => Some(!*flagged),
        }
    }

    /// `"White"`, `"Black"` or `"Draw"`
    pub fn winner_label(&self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "White",
            Some(Color::Black) => "Black",
            None => "Draw",
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            GameOverResult::WhiteWins | GameOverResult::BlackWins => "checkmate",
            GameOverResult::Draw(DrawReason::Stalemate) => "stalemate",
            GameOverResult::Draw(DrawReason::InsufficientMaterial) => "insufficient_material",
            GameOverResult::Draw(DrawReason::SeventyFiveMoves) => "seventyfive_moves",
            GameOverResult::Draw(DrawReason::FivefoldRepetition) => "fivefold_repetition",
            GameOverResult::Timeout(_) => "timeout",
        }
    }

    /// Human-readable summary for logs
    pub fn message(&self) -> &'static str {
        match self {
            GameOverResult::WhiteWins => "White wins by checkmate!",
            GameOverResult::BlackWins => "Black wins by checkmate!",
            GameOverResult::Draw(DrawReason::Stalemate) => "Draw by stalemate",
            GameOverResult::Draw(DrawReason::InsufficientMaterial) => {
                "Draw by insufficient material"
            }
            GameOverResult::Draw(DrawReason::SeventyFiveMoves) => "Draw by the 75-move rule",
            GameOverResult::Draw(DrawReason::FivefoldRepetition) => "Draw by fivefold repetition",
            GameOverResult::Timeout(Color::White) => "Black wins on time!",
            GameOverResult::Timeout(Color::Black) => "White wins on time!",
        }
    }
}

/// Final state of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub result: GameOverResult,
    /// Set only when the AI side was checkmated: whether it had zero legal
    /// replies at that moment
    pub ai_surrender: Option<bool>,
}

impl GameOver {
    pub fn payload(&self) -> GameOverPayload {
        GameOverPayload {
            winner: self.result.winner_label().to_string(),
            reason: self.result.reason().to_string(),
            ai_surrender: self.ai_surrender,
        }
    }
}

/// Session lifecycle: `InProgress` until a terminal result is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    Over(GameOver),
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Over(_))
    }

    pub fn game_over(&self) -> Option<&GameOver> {
        match self {
            GameStatus::Over(over) => Some(over),
            GameStatus::InProgress => None,
        }
    }
}
