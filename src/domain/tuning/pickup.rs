/// Gameplay tuning for dropped currency pickups.
#[derive(Debug, Clone, Copy)]
pub struct PickupTuning {
    /// World-space collision radius in pixels.
    pub radius: f32,

    /// Distance at which a pickup starts drifting toward a player.
    pub magnet_radius: f32,

    /// Drift speed toward the attracting player, in pixels per tick.
    pub pull_speed: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            radius: 10.0,
            magnet_radius: 100.0,
            pull_speed: 3.0,
        }
    }
}
