//! Game session state machine
//!
//! Owns the board, the clock and the game-over status of the single active
//! game. Every mutation goes through one of four operations:
//!
//! - `apply_human_move`: validate and play the human side's move
//! - `apply_ai_move`: commit the AI side's move for an issued [`AiTicket`]
//! - `tick`: one clock second for the side to move
//! - `reset`: replace everything with a fresh game
//!
//! Each operation returns the events to broadcast, in order. The session is
//! synchronous; [`crate::game::SharedGame`] serializes access to it and runs
//! the AI turn in between.
//!
//! # Turn order
//!
//! Side to move is read from the rules engine's own position, never from a
//! client. While the AI side owns the turn, human moves are refused.

use crate::ai::AIDifficulty;
use crate::error::{GameError, GameResult};
use crate::game::clock::{ClockStatus, GameClock, DEFAULT_CLOCK_SECS};
use crate::game::outcome::{GameOver, GameOverResult, GameStatus};
use crate::game::tips::random_tip;
use chess_logic_shared::{
    epd, fen, legal_uci_moves, normalize_promotion, parse_move, termination, to_uci, Chess,
    Color, Move, Position, Termination,
};
use serde::Serialize;
use shared::{ClockSnapshot, GameOverPayload, ServerEvent};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub initial_clock_secs: i64,
    /// Side played by the AI; the other side is the human
    pub ai_color: Color,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_clock_secs: DEFAULT_CLOCK_SECS,
            ai_color: Color::Black,
        }
    }
}

/// Permission to commit one AI move
///
/// Carries the position the AI must answer and the epoch it was issued in.
/// A reset bumps the epoch, which voids every outstanding ticket.
#[derive(Debug, Clone)]
pub struct AiTicket {
    pub epoch: u64,
    pub position: Chess,
    pub difficulty: AIDifficulty,
}

/// Events produced by an operation, plus the AI turn it started (if any)
#[derive(Debug, Default)]
pub struct PlyOutcome {
    pub events: Vec<ServerEvent>,
    pub ai_turn: Option<AiTicket>,
}

/// Read-only view served by `GET /state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub fen: String,
    pub turn: &'static str,
    pub clock: ClockSnapshot,
    pub difficulty: AIDifficulty,
    pub ai_color: &'static str,
    pub ai_thinking: bool,
    pub plies: u32,
    pub game_over: Option<GameOverPayload>,
    pub legal_moves: Vec<String>,
}

#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    position: Chess,
    /// Occurrences per position (EPD key) for fivefold repetition
    repetitions: HashMap<String, u32>,
    clock: GameClock,
    difficulty: AIDifficulty,
    status: GameStatus,
    epoch: u64,
    ai_pending: bool,
    plies: u32,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_position(config, Chess::default())
    }

    /// Start from an arbitrary position
    ///
    /// A position that is already terminal yields a session that is over.
    pub fn with_position(config: SessionConfig, position: Chess) -> Self {
        let mut session = Self {
            config,
            position,
            repetitions: HashMap::new(),
            clock: GameClock::new(config.initial_clock_secs),
            difficulty: AIDifficulty::default(),
            status: GameStatus::InProgress,
            epoch: 0,
            ai_pending: false,
            plies: 0,
        };
        let repetitions = session.record_position();
        if let Some(t) = termination(&session.position, repetitions) {
            session.finish(t);
        }
        session
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn fen(&self) -> String {
        fen(&self.position)
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    pub fn is_ai_pending(&self) -> bool {
        self.ai_pending
    }

    pub fn difficulty(&self) -> AIDifficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: AIDifficulty) {
        self.difficulty = difficulty;
    }

    /// Board and clock, as sent to a newly connected client
    pub fn connect_events(&self) -> Vec<ServerEvent> {
        vec![
            ServerEvent::UpdateBoard(self.fen()),
            ServerEvent::UpdateClock(self.clock.snapshot()),
        ]
    }

    /// Connect events plus the final result, for a client that missed events
    pub fn resync_events(&self) -> Vec<ServerEvent> {
        let mut events = self.connect_events();
        if let Some(over) = self.status.game_over() {
            events.push(ServerEvent::GameOver(over.payload()));
        }
        events
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            fen: self.fen(),
            turn: color_name(self.turn()),
            clock: self.clock.snapshot(),
            difficulty: self.difficulty,
            ai_color: color_name(self.config.ai_color),
            ai_thinking: self.ai_pending,
            plies: self.plies,
            game_over: self.status.game_over().map(GameOver::payload),
            legal_moves: if self.status.is_over() {
                Vec::new()
            } else {
                legal_uci_moves(&self.position)
            },
        }
    }

    /// Validate and play a move for the human side
    ///
    /// Refused without any change when the game is over, when the AI side
    /// owns the turn, or when the move is malformed or illegal.
    pub fn apply_human_move(&mut self, text: &str) -> GameResult<PlyOutcome> {
        if self.status.is_over() {
            return Err(GameError::GameOver);
        }
        if self.turn() == self.config.ai_color {
            return Err(GameError::AiThinking);
        }

        let m = parse_move(&self.position, text)?;
        info!("[GAME] Human plays {}", to_uci(&m));

        let events = self.commit(&m);
        Ok(PlyOutcome {
            events,
            ai_turn: self.pending_ai_turn(),
        })
    }

    /// Issue a ticket for the AI side's move, if it owns the turn
    ///
    /// At most one ticket is outstanding at a time.
    pub fn pending_ai_turn(&mut self) -> Option<AiTicket> {
        if self.ai_pending || self.status.is_over() || self.turn() != self.config.ai_color {
            return None;
        }
        self.ai_pending = true;
        Some(AiTicket {
            epoch: self.epoch,
            position: self.position.clone(),
            difficulty: self.difficulty,
        })
    }

    /// Commit the AI side's move
    ///
    /// The move is applied without another legality check: it was produced
    /// for `ticket.position`, and the board cannot change while the ticket is
    /// outstanding. Tickets from before a reset, or arriving after the game
    /// ended on time, are refused.
    pub fn apply_ai_move(&mut self, ticket: &AiTicket, m: Move) -> GameResult<Vec<ServerEvent>> {
        if ticket.epoch != self.epoch {
            return Err(GameError::StaleAiTurn);
        }
        if self.status.is_over() {
            return Err(GameError::GameOver);
        }
        if !self.ai_pending {
            return Err(GameError::StaleAiTurn);
        }

        let m = normalize_promotion(&self.position, m);
        self.ai_pending = false;
        info!("[AI] Plays {}", to_uci(&m));

        Ok(self.commit(&m))
    }

    /// One second off the clock of the side to move
    ///
    /// Ignored once the game is over.
    pub fn tick(&mut self) -> Vec<ServerEvent> {
        if self.status.is_over() {
            debug!("[CLOCK] Tick ignored, game is over");
            return Vec::new();
        }

        match self.clock.tick(self.turn()) {
            ClockStatus::Running => vec![ServerEvent::UpdateClock(self.clock.snapshot())],
            ClockStatus::Expired { flagged } => {
                let over = GameOver {
                    result: GameOverResult::Timeout(flagged),
                    ai_surrender: None,
                };
                self.status = GameStatus::Over(over);
                self.ai_pending = false;
                info!("[CLOCK] {}", over.result.message());
                vec![ServerEvent::GameOver(over.payload())]
            }
        }
    }

    /// Replace board, clock and status with a fresh game
    ///
    /// Difficulty is process-wide and survives. The epoch advances so any
    /// AI turn still running for the old game is voided.
    pub fn reset(&mut self) -> PlyOutcome {
        self.position = Chess::default();
        self.repetitions.clear();
        self.clock.reset();
        self.status = GameStatus::InProgress;
        self.epoch += 1;
        self.ai_pending = false;
        self.plies = 0;
        self.record_position();
        info!("[GAME] Game reset (epoch {})", self.epoch);

        let events = vec![
            ServerEvent::UpdateBoard(self.fen()),
            ServerEvent::UpdateClock(self.clock.snapshot()),
            ServerEvent::StrategySuggestion(random_tip().to_string()),
        ];
        PlyOutcome {
            events,
            ai_turn: self.pending_ai_turn(),
        }
    }

    fn commit(&mut self, m: &Move) -> Vec<ServerEvent> {
        self.position.play_unchecked(m);
        self.plies += 1;
        let repetitions = self.record_position();

        let mut events = vec![
            ServerEvent::UpdateBoard(self.fen()),
            ServerEvent::UpdateClock(self.clock.snapshot()),
            ServerEvent::StrategySuggestion(random_tip().to_string()),
        ];

        if let Some(t) = termination(&self.position, repetitions) {
            let over = self.finish(t);
            events.push(ServerEvent::GameOver(over.payload()));
        }
        events
    }

    /// The side to move in a checkmate is the side that was mated
    fn finish(&mut self, t: Termination) -> GameOver {
        let ai_surrender = match t {
            Termination::Checkmate { .. } if self.turn() == self.config.ai_color => {
                Some(self.position.legal_moves().is_empty())
            }
            _ => None,
        };

        let over = GameOver {
            result: t.into(),
            ai_surrender,
        };
        self.status = GameStatus::Over(over);
        self.ai_pending = false;
        info!("[GAME] {}", over.result.message());
        over
    }

    fn record_position(&mut self) -> u32 {
        let count = self.repetitions.entry(epd(&self.position)).or_insert(0);
        *count += 1;
        *count
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}
