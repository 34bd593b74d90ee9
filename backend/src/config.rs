//! Server configuration
//!
//! Every option can come from the command line or the environment; `main`
//! loads `.env` first, so a local `.env` file works too.

use crate::ai::{DisabledOracle, MoveOracle, OpenAiOracle};
use crate::game::{SessionConfig, DEFAULT_CLOCK_SECS};
use chess_logic_shared::Color;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AiSide {
    White,
    Black,
}

impl From<AiSide> for Color {
    fn from(side: AiSide) -> Self {
        match side {
            AiSide::White => Color::White,
            AiSide::Black => Color::Black,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Human vs AI chess server")]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket server listens on
    #[arg(long, env = "CHESS_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// API key for the move oracle; without it the AI plays random legal moves
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "ORACLE_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub oracle_base_url: String,

    #[arg(long, env = "ORACLE_MODEL", default_value = "gpt-4o")]
    pub oracle_model: String,

    #[arg(long, env = "ORACLE_TIMEOUT_MS", default_value_t = 10_000)]
    pub oracle_timeout_ms: u64,

    /// Pause before the AI answers
    #[arg(long, env = "AI_DELAY_MS", default_value_t = 2_000)]
    pub ai_delay_ms: u64,

    #[arg(long, env = "CLOCK_SECS", default_value_t = DEFAULT_CLOCK_SECS)]
    pub clock_secs: i64,

    #[arg(long, env = "AI_COLOR", value_enum, default_value_t = AiSide::Black)]
    pub ai_color: AiSide,

    /// Tick the clock once per second on the server instead of trusting clients
    #[arg(long, env = "SERVER_CLOCK")]
    pub server_clock: bool,
}

impl ServerConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            initial_clock_secs: self.clock_secs,
            ai_color: self.ai_color.into(),
        }
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// Configured API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn build_oracle(&self) -> Arc<dyn MoveOracle> {
        match self.api_key() {
            Some(key) => {
                let oracle = OpenAiOracle::new(
                    &self.oracle_base_url,
                    key.to_string(),
                    self.oracle_model.clone(),
                );
                info!(
                    "[AI] Using oracle {} (model {})",
                    oracle.endpoint(),
                    self.oracle_model
                );
                Arc::new(oracle)
            }
            None => {
                warn!("[AI] OPENAI_API_KEY not set, AI will play random legal moves");
                Arc::new(DisabledOracle)
            }
        }
    }
}
