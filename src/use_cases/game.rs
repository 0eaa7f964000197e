// The world task: the single owner of all entity state, driving the fixed
// cadence tick loop and broadcasting the results.

use super::types::{GameEvent, WorldStats};
use crate::domain::{SimEvent, World, WorldUpdate};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::info;

pub async fn world_task(
    mut world: World,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    event_tx: broadcast::Sender<SimEvent>,
    snapshot_tx: watch::Sender<WorldUpdate>,
    stats_tx: watch::Sender<WorldStats>,
    tick_interval: Duration,
) {
    // Fixed cadence; each step models exactly one tick-unit regardless of
    // wall-clock jitter, so physics stay reproducible under scheduling delay.
    let mut interval = tokio::time::interval(tick_interval);

    loop {
        interval.tick().await;

        // Drain every pending transport event before stepping. Late joins and
        // leaves land between ticks; inputs and shots only stage slots.
        while let Ok(ev) = input_rx.try_recv() {
            match ev {
                GameEvent::Join { player_id } => {
                    info!(player_id, "player joined");
                    let joined = world.add_player(player_id);
                    let _ = event_tx.send(joined);
                }
                GameEvent::Leave { player_id } => {
                    info!(player_id, "player left");
                    if let Some(left) = world.remove_player(player_id) {
                        let _ = event_tx.send(left);
                    }
                }
                GameEvent::Input { player_id, input } => {
                    world.post_input(player_id, input);
                }
                GameEvent::Shoot { player_id, charge } => {
                    world.post_shot(player_id, charge);
                }
            }
        }

        let (update, events) = world.step();

        for ev in events {
            let _ = event_tx.send(ev);
        }

        let _ = stats_tx.send(WorldStats {
            tick: update.tick,
            players: update.players.len(),
            bullets: update.bullets.len(),
            pickups: update.pickups.len(),
        });

        // Latest snapshot is kept for connection bootstrap and lag recovery;
        // the broadcast drives the per-tick fan-out. Fire-and-forget: no
        // acknowledgment, no backpressure.
        let _ = snapshot_tx.send(update.clone());
        let _ = world_tx.send(update);
    }
}
