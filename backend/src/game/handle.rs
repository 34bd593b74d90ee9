//! Shared handle over the single game session
//!
//! Connections never touch [`GameSession`] directly. They go through a cloned
//! [`SharedGame`], which locks the session for one synchronous operation at a
//! time and fans the resulting events out to every subscriber.
//!
//! The lock is never held across an await. The AI turn (think delay, oracle
//! call) runs unlocked in its own task and only re-locks to commit.

use crate::ai::{AIDifficulty, MoveOracleAdapter};
use crate::error::GameResult;
use crate::game::session::{AiTicket, GameSession, GameSnapshot, SessionConfig};
use parking_lot::Mutex;
use shared::ServerEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Events buffered per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct SharedGame {
    inner: Arc<GameInner>,
}

struct GameInner {
    session: Mutex<GameSession>,
    events: broadcast::Sender<ServerEvent>,
    /// Current session epoch; pending AI turns watch it for resets
    epoch: watch::Sender<u64>,
    adapter: MoveOracleAdapter,
    ai_delay: Duration,
}

impl SharedGame {
    pub fn new(config: SessionConfig, adapter: MoveOracleAdapter, ai_delay: Duration) -> Self {
        let session = GameSession::new(config);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (epoch, _) = watch::channel(session.epoch());

        Self {
            inner: Arc::new(GameInner {
                session: Mutex::new(session),
                events,
                epoch,
                adapter,
                ai_delay,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.inner.events.subscribe()
    }

    pub fn connect_events(&self) -> Vec<ServerEvent> {
        self.inner.session.lock().connect_events()
    }

    pub fn resync_events(&self) -> Vec<ServerEvent> {
        self.inner.session.lock().resync_events()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.session.lock().snapshot()
    }

    pub fn difficulty(&self) -> AIDifficulty {
        self.inner.session.lock().difficulty()
    }

    /// Applies from the next AI turn on
    pub fn set_difficulty(&self, difficulty: AIDifficulty) {
        self.inner.session.lock().set_difficulty(difficulty);
        info!("[AI] Difficulty set to {difficulty}");
    }

    /// Start the AI's turn if it owns the first move
    pub fn start(&self) -> Option<JoinHandle<()>> {
        let ticket = self.inner.session.lock().pending_ai_turn()?;
        Some(self.spawn_ai_turn(ticket))
    }

    /// Play a human move and start the AI reply it triggers
    ///
    /// Returns once the human ply is committed. The AI turn runs detached,
    /// so clock ticks and resets keep flowing while it thinks; the handle is
    /// only for callers that want to wait for the reply.
    pub fn apply_human_move(&self, text: &str) -> GameResult<Option<JoinHandle<()>>> {
        let ticket = {
            let mut session = self.inner.session.lock();
            let outcome = session.apply_human_move(text)?;
            self.broadcast(outcome.events);
            outcome.ai_turn
        };
        Ok(ticket.map(|ticket| self.spawn_ai_turn(ticket)))
    }

    pub fn tick(&self) {
        let mut session = self.inner.session.lock();
        let events = session.tick();
        self.broadcast(events);
    }

    /// Start a fresh game and cancel any pending AI turn
    pub fn reset(&self) -> Option<JoinHandle<()>> {
        let ticket = {
            let mut session = self.inner.session.lock();
            let outcome = session.reset();
            self.inner.epoch.send_replace(session.epoch());
            self.broadcast(outcome.events);
            outcome.ai_turn
        };
        ticket.map(|ticket| self.spawn_ai_turn(ticket))
    }

    fn spawn_ai_turn(&self, ticket: AiTicket) -> JoinHandle<()> {
        let game = self.clone();
        tokio::spawn(async move { game.run_ai_turn(ticket).await })
    }

    async fn run_ai_turn(&self, ticket: AiTicket) {
        let mut epoch_rx = self.inner.epoch.subscribe();
        let think = async {
            tokio::time::sleep(self.inner.ai_delay).await;
            self.inner
                .adapter
                .suggest_move(&ticket.position, ticket.difficulty)
                .await
        };

        let suggestion = tokio::select! {
            m = think => m,
            _ = superseded(&mut epoch_rx, ticket.epoch) => {
                info!("[AI] Turn for epoch {} cancelled by reset", ticket.epoch);
                return;
            }
        };

        let Some(m) = suggestion else {
            warn!("[AI] No legal move available");
            return;
        };

        let committed = {
            let mut session = self.inner.session.lock();
            session.apply_ai_move(&ticket, m)
        };
        match committed {
            Ok(events) => self.broadcast(events),
            Err(e) => debug!("[AI] Discarded move: {e}"),
        }
    }

    fn broadcast(&self, events: Vec<ServerEvent>) {
        for event in events {
            // Err only means nobody is connected
            let _ = self.inner.events.send(event);
        }
    }
}

/// Resolves once the session epoch moves past `epoch`
async fn superseded(rx: &mut watch::Receiver<u64>, epoch: u64) {
    while *rx.borrow_and_update() == epoch {
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Tick the clock for the side to move once per `period`
pub fn spawn_clock_driver(game: SharedGame, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        interval.tick().await;

        info!("[CLOCK] Server clock running every {period:?}");
        loop {
            interval.tick().await;
            game.tick();
        }
    })
}
