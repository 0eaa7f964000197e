// Read-only introspection surface; the simulation never depends on it.

use crate::interface_adapters::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub tick: u64,
    pub players: usize,
    pub bullets: usize,
    pub pickups: usize,
    pub tick_rate: u32,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = *state.stats_rx.borrow();
    Json(HealthResponse {
        tick: stats.tick,
        players: stats.players,
        bullets: stats.bullets,
        pickups: stats.pickups,
        tick_rate: state.tick_rate,
    })
}
