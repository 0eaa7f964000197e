// Domain-level simulation entities and input/snapshot types.

use crate::domain::tuning::{PlayerTuning, WorldTuning};
use rand::Rng;

/// Raw input received from a client. The newest record supersedes any older
/// one and is applied once per tick until a fresher record arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    /// Client-supplied facing angle in radians. Trusted as-is by design.
    pub angle: Option<f32>,
    /// Strictly increasing per connection; stale sequences are ignored.
    pub seq: u64,
}

pub struct SimPlayer {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Facing angle in radians. Bullets spawn along this direction.
    pub angle: f32,

    /// Single regenerating resource: health, boost fuel and ammo in one.
    pub energy: f32,
    pub money: f32,
    pub invulnerable: bool,
    pub invuln_ticks: u32,
    pub kill_streak: u32,
    pub bounty_multiplier: f32,
    pub boosting: bool,

    // Input plumbing (never serialized to clients).
    pub last_seq: u64,
    pub last_input: PlayerInput,
    pub mailbox: Option<PlayerInput>,
    pub pending_shot: Option<u8>,
}

impl SimPlayer {
    /// Builds a fresh player record: random position inside the arena minus
    /// the spawn padding, zero velocity, full energy, baseline money and the
    /// post-spawn invulnerability window asserted.
    ///
    /// Pure apart from the RNG draw; the caller registers the record.
    pub fn spawn(
        id: u64,
        world: &WorldTuning,
        tuning: &PlayerTuning,
        rng: &mut impl Rng,
    ) -> Self {
        let pad = world.spawn_padding;
        Self {
            id,
            x: rng.gen_range(pad..world.width - pad),
            y: rng.gen_range(pad..world.height - pad),
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            energy: tuning.max_energy,
            money: tuning.starting_money,
            invulnerable: true,
            invuln_ticks: tuning.invuln_ticks,
            kill_streak: 0,
            bounty_multiplier: 1.0,
            boosting: false,
            last_seq: 0,
            last_input: PlayerInput::default(),
            mailbox: None,
            pending_shot: None,
        }
    }
}

pub struct SimBullet {
    pub id: u64,
    pub owner_id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub damage: f32,
    pub charge: u8,
    pub spawn_tick: u64,
}

pub struct SimPickup {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Full currency value of the victim at the time of death.
    pub amount: f32,
}

/// Public player fields included in every world snapshot.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub energy: f32,
    pub money: f32,
    pub invulnerable: bool,
    pub invuln_ticks: u32,
    pub kill_streak: u32,
    pub bounty_multiplier: f32,
}

#[derive(Debug, Clone)]
pub struct BulletSnapshot {
    pub id: u64,
    pub owner_id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub charge: u8,
}

#[derive(Debug, Clone)]
pub struct PickupSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub amount: f32,
}

impl From<&SimPlayer> for PlayerSnapshot {
    fn from(p: &SimPlayer) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            angle: p.angle,
            energy: p.energy,
            money: p.money,
            invulnerable: p.invulnerable,
            invuln_ticks: p.invuln_ticks,
            kill_streak: p.kill_streak,
            bounty_multiplier: p.bounty_multiplier,
        }
    }
}

impl From<&SimBullet> for BulletSnapshot {
    fn from(b: &SimBullet) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            x: b.x,
            y: b.y,
            vx: b.vx,
            vy: b.vy,
            radius: b.radius,
            charge: b.charge,
        }
    }
}

impl From<&SimPickup> for PickupSnapshot {
    fn from(m: &SimPickup) -> Self {
        Self {
            id: m.id,
            x: m.x,
            y: m.y,
            radius: m.radius,
            amount: m.amount,
        }
    }
}
