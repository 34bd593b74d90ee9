//! Per-side game clock
//!
//! Each side starts with a fixed budget of whole seconds (10 minutes by
//! default). An external timer fires one tick per second for whichever side
//! owns the turn; the clock trusts the caller to name that side.
//!
//! # Time Management
//!
//! - `tick(side)` removes one second from `side`
//! - the first tick that leaves `side` at zero or below flags it
//! - `reset()` restores both sides to the initial budget

use chess_logic_shared::Color;
use shared::ClockSnapshot;

/// Initial budget per side in seconds
pub const DEFAULT_CLOCK_SECS: i64 = 600;

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    Running,
    /// `flagged` ran out of time; the other side wins
    Expired { flagged: Color },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    /// White player's remaining time in seconds
    pub white_time_left: i64,
    /// Black player's remaining time in seconds
    pub black_time_left: i64,
    initial_secs: i64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_SECS)
    }
}

impl GameClock {
    pub fn new(initial_secs: i64) -> Self {
        Self {
            white_time_left: initial_secs,
            black_time_left: initial_secs,
            initial_secs,
        }
    }

    /// Remove one second from `active`
    pub fn tick(&mut self, active: Color) -> ClockStatus {
        let left = match active {
            Color::White => &mut self.white_time_left,
            Color::Black => &mut self.black_time_left,
        };
        *left -= 1;

        if *left <= 0 {
            ClockStatus::Expired { flagged: active }
        } else {
            ClockStatus::Running
        }
    }

    pub fn reset(&mut self) {
        self.white_time_left = self.initial_secs;
        self.black_time_left = self.initial_secs;
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            white: self.white_time_left,
            black: self.black_time_left,
        }
    }
}
