use backend::ai::MoveOracleAdapter;
use backend::api::{self, AppState};
use backend::config::ServerConfig;
use backend::game::{spawn_clock_driver, SharedGame};

use clap::Parser;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    let adapter = MoveOracleAdapter::new(config.build_oracle(), config.oracle_timeout());
    let game = SharedGame::new(config.session_config(), adapter, config.ai_delay());

    // AI playing White opens immediately
    game.start();

    if config.server_clock {
        spawn_clock_driver(game.clone(), Duration::from_secs(1));
    }

    let app = api::router(AppState::new(game).with_server_clock(config.server_clock));
    let listener = TcpListener::bind(config.bind).await?;
    info!("[API] Listening on {}", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
