//! Shared chess logic and validation
//!
//! Thin layer over `shakmaty` that the game server uses as its rules engine.
//! The server never inspects the board directly: it asks this crate to parse
//! and validate coordinate moves, serialize positions, and report whether the
//! game has ended.
//!
//! # Promotion policy
//!
//! A pawn move that reaches the last rank without a promotion suffix is
//! completed as a Queen promotion before legality is checked, so `e7e8`
//! and `e7e8q` name the same move.

pub mod error;
pub mod moves;
pub mod status;

pub use error::MoveError;
pub use moves::{legal_uci_moves, normalize_promotion, parse_move, to_uci};
pub use status::{
    epd, fen, position_from_fen, termination, Termination, FIVEFOLD_REPETITION,
    SEVENTY_FIVE_MOVE_PLIES,
};

pub use shakmaty::{Chess, Color, Move, Position, Role};
