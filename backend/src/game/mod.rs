//! The single game hosted by this server
//!
//! - `clock`: per-side countdown
//! - `outcome`: terminal results and the `game_over` payload
//! - `session`: the synchronous state machine
//! - `handle`: shared, lock-guarded access plus the AI turn task
//! - `tips`: strategy hints sent after each ply

pub mod clock;
pub mod handle;
pub mod outcome;
pub mod session;
pub mod tips;

pub use clock::{ClockStatus, GameClock, DEFAULT_CLOCK_SECS};
pub use handle::{spawn_clock_driver, SharedGame};
pub use outcome::{DrawReason, GameOver, GameOverResult, GameStatus};
pub use session::{AiTicket, GameSession, GameSnapshot, PlyOutcome, SessionConfig};
pub use tips::{random_tip, STRATEGY_TIPS};
