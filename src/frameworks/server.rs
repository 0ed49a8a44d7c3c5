// Framework bootstrap for the relay server runtime.

use crate::domain::GameConfig;
use crate::frameworks::config;
use crate::interface_adapters::net::{relay_output_serializer, ws_handler};
use crate::interface_adapters::state::{AppState, Envelope};
use crate::use_cases::{RelayEvent, RelayOutput, relay_task};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{broadcast, mpsc};

/// Loads `.env`, installs the tracing subscriber and the panic hook.
pub fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, game_config: GameConfig) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(game_config)?;

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let game_config = config::game_config();
    let address = SocketAddr::from(([0, 0, 0, 0], config::relay_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, game_config).await
}

fn build_state(game_config: GameConfig) -> Result<Arc<AppState>> {
    game_config
        .validate()
        .map_err(|e| std::io::Error::other(format!("invalid game config: {e}")))?;

    // All connection events go to the single relay world task.
    let (input_tx, input_rx) = mpsc::channel::<RelayEvent>(config::INPUT_CHANNEL_CAPACITY);
    let (output_tx, output_rx) =
        broadcast::channel::<RelayOutput>(config::RELAY_BROADCAST_CAPACITY);
    let (envelope_tx, _envelope_rx) =
        broadcast::channel::<Envelope>(config::RELAY_BROADCAST_CAPACITY);

    tokio::spawn(relay_task(input_rx, output_tx, game_config));
    tokio::spawn(relay_output_serializer(output_rx, envelope_tx.clone()));
    tracing::debug!(
        width = game_config.container_width,
        height = game_config.container_height,
        "relay world started"
    );

    Ok(Arc::new(AppState {
        input_tx,
        envelope_tx,
    }))
}
