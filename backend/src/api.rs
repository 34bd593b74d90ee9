//! HTTP and WebSocket surface
//!
//! - `GET /ws`: event stream for one client (board, clock, tips, game over)
//! - `POST /set_difficulty`: change the AI persona tier
//! - `GET /state`: JSON snapshot of the game
//! - `GET /health`: liveness probe

use crate::ai::AIDifficulty;
use crate::error::ApiError;
use crate::game::{GameSnapshot, SharedGame};
use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Json, State,
    },
    response::Response,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use shared::{ClientEvent, ServerEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub game: SharedGame,
    /// When the server drives the clock, client `clock_tick` events are ignored
    pub server_clock: bool,
}

impl AppState {
    pub fn new(game: SharedGame) -> Self {
        Self {
            game,
            server_clock: false,
        }
    }

    pub fn with_server_clock(mut self, server_clock: bool) -> Self {
        self.server_clock = server_clock;
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct SetDifficultyRequest {
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/set_difficulty", post(set_difficulty))
        .route("/state", get(game_state))
        .route("/health", get(health))
        .with_state(state)
}

/// Unknown values, a missing field and unparsable bodies all get the same 400
async fn set_difficulty(
    State(state): State<AppState>,
    payload: Result<Json<SetDifficultyRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let requested = match payload {
        Ok(Json(request)) => request.difficulty,
        Err(rejection) => {
            debug!("[API] set_difficulty body rejected: {rejection}");
            None
        }
    };

    let difficulty = requested
        .as_deref()
        .and_then(|d| d.parse::<AIDifficulty>().ok())
        .ok_or_else(|| {
            warn!("[API] Invalid difficulty requested: {requested:?}");
            ApiError::InvalidDifficulty
        })?;

    state.game.set_difficulty(difficulty);
    Ok(Json(StatusResponse::success(format!(
        "Difficulty set to {difficulty}"
    ))))
}

async fn game_state(State(state): State<AppState>) -> Json<GameSnapshot> {
    Json(state.game.snapshot())
}

async fn health() -> &'static str {
    "ok"
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut events = state.game.subscribe();
    info!("[API] Client connected");

    for event in state.game.connect_events() {
        if send_event(&mut socket, &event).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = handle_client_text(&state, text.as_str()) {
                        if send_event(&mut socket, &reply).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("[API] WebSocket error: {e}");
                    break;
                }
            },
            broadcast = events.recv() => match broadcast {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("[API] Client lagged by {skipped} events, resyncing");
                    for event in state.game.resync_events() {
                        if send_event(&mut socket, &event).await.is_err() {
                            return;
                        }
                    }
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("[API] Client disconnected");
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!("[API] Failed to encode event: {e}");
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await
}

/// Decode one client frame and act on it
///
/// Frames that are not a known client event are logged and dropped.
pub fn handle_client_text(state: &AppState, text: &str) -> Option<ServerEvent> {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => dispatch(state, event),
        Err(e) => {
            warn!("[API] Ignoring unrecognised client message: {e}");
            None
        }
    }
}

/// Apply a client event; the return value goes back to that client only
///
/// Everything else reaches clients through the broadcast channel. Never
/// waits on the AI: its reply arrives later as a broadcast, and the socket
/// keeps reading ticks and resets in the meantime.
pub fn dispatch(state: &AppState, event: ClientEvent) -> Option<ServerEvent> {
    match event {
        // The AI reply (if any) runs detached
        ClientEvent::Move { uci } => match state.game.apply_human_move(&uci) {
            Ok(_) => None,
            Err(e) => {
                info!("[API] Move {uci:?} rejected: {e}");
                Some(ServerEvent::MoveRejected {
                    uci,
                    reason: e.to_string(),
                })
            }
        },
        ClientEvent::ClockTick => {
            if state.server_clock {
                debug!("[API] Client clock tick ignored, server drives the clock");
            } else {
                state.game.tick();
            }
            None
        }
        ClientEvent::ResetGame => {
            // A new AI opening (if any) runs detached
            let _ = state.game.reset();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{DisabledOracle, MoveOracleAdapter};
    use crate::game::SessionConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_state(ai_delay: Duration) -> AppState {
        let adapter = MoveOracleAdapter::new(Arc::new(DisabledOracle), Duration::from_millis(50));
        let game = SharedGame::new(SessionConfig::default(), adapter, ai_delay);
        AppState::new(game)
    }

    fn move_event(uci: &str) -> ClientEvent {
        ClientEvent::Move {
            uci: uci.to_string(),
        }
    }

    #[test]
    fn test_status_response_serialization() {
        let json = serde_json::to_value(StatusResponse::success("Difficulty set to hard"))
            .expect("Should serialize");
        assert_eq!(
            json,
            serde_json::json!({"status": "success", "message": "Difficulty set to hard"})
        );

        let error = StatusResponse::error("Invalid difficulty level");
        assert_eq!(error.status, "error");
    }

    #[test]
    fn test_set_difficulty_request_missing_field() {
        let request: SetDifficultyRequest = serde_json::from_str("{}").expect("Should deserialize");
        assert!(request.difficulty.is_none());
    }

    #[tokio::test]
    async fn test_illegal_move_rejected_to_sender() {
        let state = test_state(Duration::ZERO);
        let reply = dispatch(&state, move_event("e2e5"));

        match reply {
            Some(ServerEvent::MoveRejected { uci, reason }) => {
                assert_eq!(uci, "e2e5");
                assert!(reason.contains("e2e5"), "reason: {reason}");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(state.game.snapshot().plies, 0);
    }

    #[tokio::test]
    async fn test_move_returns_before_ai_reply() {
        let state = test_state(Duration::from_secs(5));
        let reply = handle_client_text(&state, r#"{"event":"move","data":{"move":"e2e4"}}"#);

        assert!(reply.is_none());
        let snap = state.game.snapshot();
        assert_eq!(snap.plies, 1);
        assert!(snap.ai_thinking);
    }

    #[tokio::test]
    async fn test_tick_during_ai_turn_charges_ai_clock() {
        let state = test_state(Duration::from_secs(5));
        dispatch(&state, move_event("e2e4"));

        for _ in 0..3 {
            dispatch(&state, ClientEvent::ClockTick);
        }

        let clock = state.game.snapshot().clock;
        assert_eq!(clock.white, 600);
        assert_eq!(clock.black, 597);
    }

    #[tokio::test]
    async fn test_reset_during_ai_turn_takes_effect_immediately() {
        let state = test_state(Duration::from_secs(5));
        dispatch(&state, move_event("e2e4"));
        dispatch(&state, ClientEvent::ResetGame);

        let snap = state.game.snapshot();
        assert_eq!(snap.plies, 0);
        assert_eq!(snap.turn, "white");
        assert!(!snap.ai_thinking);
    }

    #[tokio::test]
    async fn test_garbage_frame_ignored() {
        let state = test_state(Duration::ZERO);
        assert!(handle_client_text(&state, "not json").is_none());
        assert!(handle_client_text(&state, r#"{"event":"resign"}"#).is_none());
    }

    #[tokio::test]
    async fn test_client_tick_respects_server_clock() {
        let state = test_state(Duration::ZERO).with_server_clock(true);
        dispatch(&state, ClientEvent::ClockTick);
        assert_eq!(state.game.snapshot().clock.white, 600);

        let state = test_state(Duration::ZERO);
        dispatch(&state, ClientEvent::ClockTick);
        assert_eq!(state.game.snapshot().clock.white, 599);
    }
}
