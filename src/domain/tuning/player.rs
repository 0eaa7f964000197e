/// Gameplay tuning for player movement, energy and respawn protection.
///
/// All rates are per tick; the simulation runs on a fixed logical timestep.
#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// World-space collision radius in pixels.
    pub radius: f32,

    /// Velocity gained per tick of held directional input.
    pub accel: f32,

    /// Speed ceiling while not boosting, in pixels per tick.
    pub max_speed: f32,

    /// Speed ceiling while boosting, in pixels per tick.
    pub boost_max_speed: f32,

    /// Hard velocity ceiling enforced independently of boost state.
    /// Anything above it is treated as tampering and rescaled down.
    pub speed_hack_cap: f32,

    /// Exponential velocity decay factor applied once per tick.
    pub momentum_decay: f32,

    /// Upper bound for the energy resource.
    pub max_energy: f32,

    /// Energy regained per tick while not boosting.
    pub energy_regen: f32,

    /// Energy drained per tick while boosting.
    pub boost_drain: f32,

    /// Post-spawn invulnerability window, in ticks.
    pub invuln_ticks: u32,

    /// Currency value every fresh spawn starts with.
    pub starting_money: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 20.0,
            accel: 0.55,
            max_speed: 5.0,
            boost_max_speed: 8.0,
            speed_hack_cap: 10.0,
            momentum_decay: 0.93,
            max_energy: 100.0,
            energy_regen: 0.4,
            boost_drain: 0.8,
            invuln_ticks: 180,
            starting_money: 1.0,
        }
    }
}
