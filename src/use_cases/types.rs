// Use-case level inputs/outputs for the game loop.

use crate::domain::PlayerInput;

/// Transport events flowing into the world task. Input and Shoot only fill
/// per-player slots; Join and Leave edit the live set between ticks.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Join { player_id: u64 },
    Leave { player_id: u64 },
    Input { player_id: u64, input: PlayerInput },
    Shoot { player_id: u64, charge: u8 },
}

/// Live entity counts published once per tick for the health endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldStats {
    pub tick: u64,
    pub players: usize,
    pub bullets: usize,
    pub pickups: usize,
}
