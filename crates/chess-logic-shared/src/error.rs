//! Error types for move validation

use thiserror::Error;

/// Reasons a submitted move is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Text is not coordinate notation (e.g. `e2e4`, `e7e8q`)
    #[error("Malformed move notation: {text:?}")]
    Malformed { text: String },

    /// Well-formed, but not in the current legal-move set
    #[error("Illegal move: {uci}")]
    Illegal { uci: String },
}

/// Result type alias for rules operations
pub type MoveResult<T> = Result<T, MoveError>;
