//! AI opponent: difficulty settings and the move oracle
//!
//! The AI side's moves come from an external suggestion service that gives
//! no legality guarantee. [`MoveOracleAdapter`] is the only path from that
//! service into the game, and it always hands back a legal move.
//!
//! # Architecture
//!
//! - `AIDifficulty`: process-wide persona tier sent to the oracle
//! - `MoveOracle`: async trait over the external service
//! - `MoveOracleAdapter`: timeout, reply parsing, legality check, random fallback

pub mod adapter;
pub mod difficulty;
pub mod oracle;

pub use adapter::{parse_reply, random_legal_move, MoveOracleAdapter};
pub use difficulty::{AIDifficulty, UnknownDifficulty};
pub use oracle::{DisabledOracle, MoveOracle, OpenAiOracle, OracleError, OracleRequest};
