//! Coordinate-notation move parsing and the auto-queen promotion policy

use crate::error::{MoveError, MoveResult};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, Move, Position, Rank, Role, Square};

/// Parse a coordinate move (`e2e4`, `e7e8q`) and validate it against `position`
///
/// The text is trimmed and lowercased first. A pawn move to the last rank
/// without a suffix is completed as a Queen promotion before the legality
/// check, so the returned move is always a member of
/// `position.legal_moves()`.
pub fn parse_move(position: &Chess, text: &str) -> MoveResult<Move> {
    let text = text.trim().to_ascii_lowercase();
    let uci: UciMove = text
        .parse()
        .map_err(|_| MoveError::Malformed { text: text.clone() })?;

    let uci = auto_promote(position, uci);
    uci.to_move(position).map_err(|_| MoveError::Illegal {
        uci: uci.to_string(),
    })
}

/// Apply the auto-queen policy to an already decoded move
///
/// Legal pawn moves produced by the rules engine always carry a promotion
/// role, so this only changes moves assembled elsewhere.
pub fn normalize_promotion(position: &Chess, m: Move) -> Move {
    match m {
        Move::Normal {
            role: Role::Pawn,
            from,
            capture,
            to,
            promotion: None,
        } if to.rank() == last_rank(position.turn()) => Move::Normal {
            role: Role::Pawn,
            from,
            capture,
            to,
            promotion: Some(Role::Queen),
        },
        other => other,
    }
}

/// Standard coordinate notation for a move (`e1g1` for short castling)
pub fn to_uci(m: &Move) -> String {
    m.to_uci(CastlingMode::Standard).to_string()
}

/// Every legal move for the side to move, in coordinate notation
pub fn legal_uci_moves(position: &Chess) -> Vec<String> {
    position.legal_moves().iter().map(to_uci).collect()
}

fn auto_promote(position: &Chess, uci: UciMove) -> UciMove {
    match uci {
        UciMove::Normal {
            from,
            to,
            promotion: None,
        } if pawn_reaches_last_rank(position, from, to) => UciMove::Normal {
            from,
            to,
            promotion: Some(Role::Queen),
        },
        other => other,
    }
}

fn pawn_reaches_last_rank(position: &Chess, from: Square, to: Square) -> bool {
    match position.board().piece_at(from) {
        Some(piece) if piece.role == Role::Pawn => to.rank() == last_rank(piece.color),
        _ => false,
    }
}

fn last_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    }
}
