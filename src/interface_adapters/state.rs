use crate::domain::tuning::Tuning;
use crate::domain::{SimEvent, WorldUpdate};
use crate::use_cases::{GameEvent, WorldStats};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Inputs flowing from the network into the game loop.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized snapshots and events, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    pub event_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized snapshot for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Latest domain snapshot, embedded into the init payload on connect.
    pub snapshot_rx: watch::Receiver<WorldUpdate>,
    // Per-tick entity counts for the health endpoint.
    pub stats_rx: watch::Receiver<WorldStats>,
    // Raw event stream (kept so late subscribers can be wired in tests).
    pub event_tx: broadcast::Sender<SimEvent>,
    // Constant table echoed to every client on connect.
    pub tuning: Tuning,
    pub tick_rate: u32,
}
