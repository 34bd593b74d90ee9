//! Position serialization and terminal-status detection
//!
//! Only the automatic terminations are reported: checkmate, stalemate,
//! insufficient material, the seventy-five-move rule and fivefold
//! repetition. Claimable draws (fifty moves, threefold) are not.

use shakmaty::fen::{Epd, Fen};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position};

/// Half-move clock value at which the game is drawn automatically
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Occurrences of one position that end the game automatically
pub const FIVEFOLD_REPETITION: u32 = 5;

/// Why a position is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl Termination {
    /// The winning side, `None` for draws
    pub fn winner(&self) -> Option<Color> {
        match self {
            Termination::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }

    /// Wire name of the termination reason
    pub fn reason(&self) -> &'static str {
        match self {
            Termination::Checkmate { .. } => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::InsufficientMaterial => "insufficient_material",
            Termination::SeventyFiveMoves => "seventyfive_moves",
            Termination::FivefoldRepetition => "fivefold_repetition",
        }
    }
}

/// Report whether `position` ends the game
///
/// `repetitions` is how many times the current position (by [`epd`]) has
/// occurred, including now. Checkmate takes precedence over every draw.
pub fn termination(position: &Chess, repetitions: u32) -> Option<Termination> {
    if position.is_checkmate() {
        return Some(Termination::Checkmate {
            winner: !position.turn(),
        });
    }
    if position.is_stalemate() {
        return Some(Termination::Stalemate);
    }
    if position.is_insufficient_material() {
        return Some(Termination::InsufficientMaterial);
    }
    if position.halfmoves() >= SEVENTY_FIVE_MOVE_PLIES {
        return Some(Termination::SeventyFiveMoves);
    }
    if repetitions >= FIVEFOLD_REPETITION {
        return Some(Termination::FivefoldRepetition);
    }
    None
}

/// Full FEN of the position, as pushed to clients and sent to the oracle
pub fn fen(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// FEN without move counters, used as the repetition key
pub fn epd(position: &Chess) -> String {
    Epd::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// Load a standard-chess position from FEN
pub fn position_from_fen(text: &str) -> Option<Chess> {
    let fen: Fen = text.trim().parse().ok()?;
    fen.into_position(CastlingMode::Standard).ok()
}
