//! Move oracle adapter
//!
//! Turns an unreliable oracle into a move the game can apply without
//! checking it again:
//!
//! 1. Build the request (FEN + persona) and call the oracle under a timeout
//! 2. Scan the reply for the first legal coordinate move (auto-queen applied)
//! 3. On any failure, pick uniformly from the legal moves
//!
//! Step 3 is reachable from every failure path and cannot itself fail while
//! the side to move has at least one legal move.

use crate::ai::difficulty::AIDifficulty;
use crate::ai::oracle::{MoveOracle, OracleError, OracleRequest};
use chess_logic_shared::{parse_move, to_uci, Chess, Move, MoveError, Position};
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct MoveOracleAdapter {
    oracle: Arc<dyn MoveOracle>,
    timeout: Duration,
}

impl MoveOracleAdapter {
    pub fn new(oracle: Arc<dyn MoveOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Suggest a legal move for the side to move in `position`
    ///
    /// Oracle failures are logged and absorbed. Returns `None` only when the
    /// position has no legal moves, which the game never asks about.
    pub async fn suggest_move(&self, position: &Chess, difficulty: AIDifficulty) -> Option<Move> {
        info!("[AI] Analyzing position (difficulty: {difficulty})");

        match self.ask_oracle(position, difficulty).await {
            Ok(m) => {
                info!("[AI] Oracle move accepted: {}", to_uci(&m));
                Some(m)
            }
            Err(e) => {
                warn!("[AI] {e}; falling back to a random legal move");
                let fallback = random_legal_move(position);
                if let Some(m) = &fallback {
                    info!("[AI] Random fallback move: {}", to_uci(m));
                }
                fallback
            }
        }
    }

    async fn ask_oracle(&self, position: &Chess, difficulty: AIDifficulty) -> Result<Move, OracleError> {
        let request = OracleRequest::new(position, difficulty);
        let reply = tokio::time::timeout(self.timeout, self.oracle.suggest(&request))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout))??;

        debug!("[AI] Oracle replied: {reply:?}");
        parse_reply(position, &reply)
    }
}

/// Extract the first legal coordinate move from free text
///
/// Tokens are split on whitespace and stripped of surrounding punctuation,
/// so `"Best move: e7e5."` yields `e7e5`.
pub fn parse_reply(position: &Chess, reply: &str) -> Result<Move, OracleError> {
    let mut first_illegal = None;

    for token in reply.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        match parse_move(position, token) {
            Ok(m) => return Ok(m),
            Err(MoveError::Illegal { uci }) => {
                first_illegal.get_or_insert(uci);
            }
            Err(MoveError::Malformed { .. }) => {}
        }
    }

    Err(match first_illegal {
        Some(uci) => OracleError::IllegalSuggestion { uci },
        None => OracleError::Unparsable {
            reply: reply.to_string(),
        },
    })
}

/// Uniformly random legal move, `None` if there is none
pub fn random_legal_move(position: &Chess) -> Option<Move> {
    let moves = position.legal_moves();
    moves.as_slice().choose(&mut rand::rng()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chess_logic_shared::{legal_uci_moves, position_from_fen, Role};

    struct FixedOracle(Result<&'static str, ()>);

    #[async_trait]
    impl MoveOracle for FixedOracle {
        async fn suggest(&self, _request: &OracleRequest) -> Result<String, OracleError> {
            self.0
                .map(str::to_string)
                .map_err(|_| OracleError::EmptyReply)
        }
    }

    struct HangingOracle;

    #[async_trait]
    impl MoveOracle for HangingOracle {
        async fn suggest(&self, _request: &OracleRequest) -> Result<String, OracleError> {
            std::future::pending().await
        }
    }

    fn adapter(oracle: impl MoveOracle + 'static) -> MoveOracleAdapter {
        MoveOracleAdapter::new(Arc::new(oracle), Duration::from_millis(50))
    }

    fn after_e4() -> Chess {
        let mut pos = Chess::default();
        let m = parse_move(&pos, "e2e4").expect("legal");
        pos.play_unchecked(&m);
        pos
    }

    #[test]
    fn test_parse_reply_plain_move() {
        let m = parse_reply(&after_e4(), "e7e5").expect("legal reply");
        assert_eq!(to_uci(&m), "e7e5");
    }

    #[test]
    fn test_parse_reply_inside_prose() {
        let m = parse_reply(&after_e4(), "I would play c7c5, the Sicilian.").expect("legal reply");
        assert_eq!(to_uci(&m), "c7c5");
    }

    #[test]
    fn test_parse_reply_skips_illegal_token_for_later_legal_one() {
        let m = parse_reply(&after_e4(), "e2e4 or maybe e7e5").expect("legal reply");
        assert_eq!(to_uci(&m), "e7e5");
    }

    #[test]
    fn test_parse_reply_garbage() {
        let result = parse_reply(&after_e4(), "Knight to f6!");
        assert!(matches!(result, Err(OracleError::Unparsable { .. })));
    }

    #[test]
    fn test_parse_reply_illegal_only() {
        let result = parse_reply(&after_e4(), "e2e4");
        assert!(matches!(
            result,
            Err(OracleError::IllegalSuggestion { ref uci }) if uci == "e2e4"
        ));
    }

    #[test]
    fn test_parse_reply_completes_promotion() {
        let pos = position_from_fen("4k3/8/8/8/8/8/3p4/K7 b - - 0 1").expect("valid fen");
        let m = parse_reply(&pos, "d2d1").expect("legal reply");
        assert_eq!(m.promotion(), Some(Role::Queen));
    }

    #[test]
    fn test_random_legal_move_is_legal() {
        let pos = after_e4();
        let legal = legal_uci_moves(&pos);
        for _ in 0..50 {
            let m = random_legal_move(&pos).expect("Black has moves");
            assert!(legal.contains(&to_uci(&m)));
        }
    }

    #[test]
    fn test_random_legal_move_none_when_mated() {
        let mut pos = Chess::default();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let m = parse_move(&pos, uci).expect("legal");
            pos.play_unchecked(&m);
        }
        assert!(random_legal_move(&pos).is_none());
    }

    #[tokio::test]
    async fn test_suggest_move_uses_valid_oracle_reply() {
        let adapter = adapter(FixedOracle(Ok("e7e5")));
        let m = adapter
            .suggest_move(&after_e4(), AIDifficulty::Hard)
            .await
            .expect("move");
        assert_eq!(to_uci(&m), "e7e5");
    }

    #[tokio::test]
    async fn test_suggest_move_always_legal_for_every_failure_and_tier() {
        let pos = after_e4();
        let legal = legal_uci_moves(&pos);
        let adapters = [
            adapter(FixedOracle(Err(()))),
            adapter(FixedOracle(Ok("no idea"))),
            adapter(FixedOracle(Ok("e2e4"))),
            adapter(HangingOracle),
        ];

        for adapter in &adapters {
            for difficulty in AIDifficulty::ALL {
                let m = adapter
                    .suggest_move(&pos, difficulty)
                    .await
                    .expect("fallback move");
                assert!(legal.contains(&to_uci(&m)), "{} is not legal", to_uci(&m));
            }
        }
    }
}
