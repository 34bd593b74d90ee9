//! Wire types shared between the game server and its clients

pub mod protocol;

pub use protocol::{ClientEvent, ClockSnapshot, GameOverPayload, ServerEvent};
