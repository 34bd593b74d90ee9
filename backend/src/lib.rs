//! Human vs AI chess game server
//!
//! One authoritative game per process. Clients connect over WebSocket and
//! submit moves, clock ticks and resets; the server validates every move
//! through `chess-logic-shared`, answers with the AI side's move, and pushes
//! board, clock and game-over events to everyone connected.

pub mod ai;
pub mod api;
pub mod config;
pub mod error;
pub mod game;
