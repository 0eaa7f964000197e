// Framework bootstrap for the arena server runtime.

use crate::domain::tuning::Tuning;
use crate::domain::{World, WorldUpdate};
use crate::frameworks::config;
use crate::interface_adapters::http::health_handler;
use crate::interface_adapters::net::{event_serializer, world_update_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{WorldStats, world_task};

use axum::{Router, extract::ws::Utf8Bytes, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{broadcast, mpsc, watch};

fn init_runtime() {
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

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

/// Builds the channel topology, then spawns the world task and both
/// serializer tasks before any client can connect.
fn build_state() -> Arc<AppState> {
    let tuning = Tuning::default();
    let tick_rate = config::tick_rate();

    let world = World::new(tuning);

    let (input_tx, input_rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);
    let (world_tx, world_rx) = broadcast::channel(config::WORLD_BROADCAST_CAPACITY);
    let (event_tx, event_rx) = broadcast::channel(config::EVENT_BROADCAST_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(WorldUpdate::default());
    let (stats_tx, stats_rx) = watch::channel(WorldStats::default());

    let (world_bytes_tx, _) = broadcast::channel::<Utf8Bytes>(config::WORLD_BROADCAST_CAPACITY);
    let (event_bytes_tx, _) = broadcast::channel::<Utf8Bytes>(config::EVENT_BROADCAST_CAPACITY);
    let (world_latest_tx, _) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));

    tokio::spawn(world_task(
        world,
        input_rx,
        world_tx,
        event_tx.clone(),
        snapshot_tx,
        stats_tx,
        config::tick_interval(tick_rate),
    ));
    tokio::spawn(world_update_serializer(
        world_rx,
        world_bytes_tx.clone(),
        world_latest_tx.clone(),
    ));
    tokio::spawn(event_serializer(event_rx, event_bytes_tx.clone()));

    Arc::new(AppState {
        input_tx,
        world_bytes_tx,
        event_bytes_tx,
        world_latest_tx,
        snapshot_rx,
        stats_rx,
        event_tx,
        tuning,
        tick_rate,
    })
}
