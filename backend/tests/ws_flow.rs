//! WebSocket flow against a live server
//!
//! Each test serves the router on an ephemeral port and talks to `/ws` with a
//! real client, so socket-loop ordering is exercised end to end.

use backend::ai::{DisabledOracle, MoveOracleAdapter};
use backend::api::{self, AppState};
use backend::game::{SessionConfig, SharedGame};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use shared::{ClockSnapshot, ServerEvent};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Helper to serve a fresh game on 127.0.0.1:0
async fn spawn_server(ai_delay: Duration) -> (SocketAddr, SharedGame) {
    let adapter = MoveOracleAdapter::new(Arc::new(DisabledOracle), Duration::from_millis(50));
    let game = SharedGame::new(SessionConfig::default(), adapter, ai_delay);
    let app = api::router(AppState::new(game.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, game)
}

/// Connect and consume the board + clock greeting
async fn connect(addr: SocketAddr) -> Client {
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    assert!(matches!(next_event(&mut ws).await, ServerEvent::UpdateBoard(_)));
    assert!(matches!(next_event(&mut ws).await, ServerEvent::UpdateClock(_)));
    ws
}

async fn send(ws: &mut Client, frame: Value) {
    ws.send(Message::text(frame.to_string())).await.unwrap();
}

async fn next_event(ws: &mut Client) -> ServerEvent {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(3), ws.next())
            .await
            .expect("event within timeout")
            .expect("socket open")
            .expect("valid frame");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn next_events(ws: &mut Client, count: usize) -> Vec<ServerEvent> {
    let mut events = Vec::with_capacity(count);
    for _ in 0..count {
        events.push(next_event(ws).await);
    }
    events
}

fn move_frame(uci: &str) -> Value {
    json!({"event": "move", "data": {"move": uci}})
}

#[tokio::test]
async fn test_connect_sends_board_then_clock() {
    let (addr, _game) = spawn_server(Duration::ZERO).await;
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::UpdateBoard(START_FEN.to_string())
    );
    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::UpdateClock(ClockSnapshot {
            white: 600,
            black: 600
        })
    );
}

#[tokio::test]
async fn test_move_and_ai_reply_reach_every_client() {
    let (addr, _game) = spawn_server(Duration::ZERO).await;
    let mut mover = connect(addr).await;
    let mut watcher = connect(addr).await;

    send(&mut mover, move_frame("e2e4")).await;

    for ws in [&mut mover, &mut watcher] {
        let events = next_events(ws, 6).await;
        assert!(matches!(events[0], ServerEvent::UpdateBoard(ref fen) if fen.contains(" b ")));
        assert!(matches!(events[2], ServerEvent::StrategySuggestion(_)));
        assert!(matches!(events[3], ServerEvent::UpdateBoard(ref fen) if fen.contains(" w ")));
    }
}

#[tokio::test]
async fn test_rejection_goes_to_sender_only() {
    let (addr, _game) = spawn_server(Duration::ZERO).await;
    let mut mover = connect(addr).await;
    let mut watcher = connect(addr).await;

    send(&mut mover, move_frame("e2e5")).await;
    match next_event(&mut mover).await {
        ServerEvent::MoveRejected { uci, .. } => assert_eq!(uci, "e2e5"),
        other => panic!("expected rejection, got {other:?}"),
    }

    // Next thing the watcher sees is the tick, not the rejection
    send(&mut mover, json!({"event": "clock_tick"})).await;
    assert_eq!(
        next_event(&mut watcher).await,
        ServerEvent::UpdateClock(ClockSnapshot {
            white: 599,
            black: 600
        })
    );
}

#[tokio::test]
async fn test_ticks_during_ai_turn_charge_ai_clock() {
    let (addr, game) = spawn_server(Duration::from_millis(1500)).await;
    let mut ws = connect(addr).await;

    send(&mut ws, move_frame("e2e4")).await;
    next_events(&mut ws, 3).await;

    for _ in 0..3 {
        send(&mut ws, json!({"event": "clock_tick"})).await;
    }

    let clocks = next_events(&mut ws, 3).await;
    assert_eq!(
        clocks.last(),
        Some(&ServerEvent::UpdateClock(ClockSnapshot {
            white: 600,
            black: 597
        }))
    );
    assert!(game.snapshot().ai_thinking, "AI still thinking");
}

#[tokio::test]
async fn test_reset_from_mover_cancels_ai_turn() {
    let (addr, game) = spawn_server(Duration::from_millis(1500)).await;
    let mut ws = connect(addr).await;

    send(&mut ws, move_frame("e2e4")).await;
    next_events(&mut ws, 3).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    send(&mut ws, json!({"event": "reset_game"})).await;

    let events = next_events(&mut ws, 3).await;
    assert_eq!(events[0], ServerEvent::UpdateBoard(START_FEN.to_string()));

    let snap = game.snapshot();
    assert_eq!(snap.plies, 0);
    assert!(!snap.ai_thinking);

    // The cancelled reply never arrives
    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(game.snapshot().plies, 0);
}
