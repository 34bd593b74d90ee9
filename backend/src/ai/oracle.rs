//! External move-suggestion service
//!
//! The oracle receives the position as FEN plus a persona instruction and
//! answers with free text. Nothing about the reply is trusted: parsing and
//! legality checks happen in [`crate::ai::adapter`].

use crate::ai::difficulty::AIDifficulty;
use async_trait::async_trait;
use chess_logic_shared::{fen, Chess, Color, Position};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Every way an oracle round-trip can fail
///
/// None of these reach players; the adapter logs them and plays a random
/// legal move instead.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle did not answer within {0:?}")]
    Timeout(Duration),

    #[error("oracle reply had no content")]
    EmptyReply,

    #[error("oracle reply contains no coordinate move: {reply:?}")]
    Unparsable { reply: String },

    #[error("oracle suggested an illegal move: {uci}")]
    IllegalSuggestion { uci: String },

    #[error("no oracle configured")]
    NotConfigured,
}

/// What the oracle is asked about one AI turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub fen: String,
    pub side_to_move: Color,
    pub difficulty: AIDifficulty,
}

impl OracleRequest {
    pub fn new(position: &Chess, difficulty: AIDifficulty) -> Self {
        Self {
            fen: fen(position),
            side_to_move: position.turn(),
            difficulty,
        }
    }

    pub fn system_prompt(&self) -> String {
        format!("You are a chess AI. {}", self.difficulty.persona_prompt())
    }

    pub fn user_prompt(&self) -> String {
        let side = match self.side_to_move {
            Color::White => "White",
            Color::Black => "Black",
        };
        format!(
            "Here's the current chess position in FEN format: {}. What's the best move for {}? \
             Answer with a single move in UCI coordinate notation, for example e7e5.",
            self.fen, side
        )
    }
}

/// Source of AI move suggestions
#[async_trait]
pub trait MoveOracle: Send + Sync {
    /// Ask for a move; the reply is free text with no legality guarantee
    async fn suggest(&self, request: &OracleRequest) -> Result<String, OracleError>;
}

/// Oracle used when no API key is configured
///
/// Every call fails, so the AI plays uniformly random legal moves.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledOracle;

#[async_trait]
impl MoveOracle for DisabledOracle {
    async fn suggest(&self, _request: &OracleRequest) -> Result<String, OracleError> {
        Err(OracleError::NotConfigured)
    }
}

/// OpenAI-compatible chat-completions oracle
pub struct OpenAiOracle {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiOracle {
    pub fn new(base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MoveOracle for OpenAiOracle {
    async fn suggest(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user_prompt(),
                },
            ],
            max_tokens: 16,
        };

        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(OracleError::EmptyReply)
    }
}
