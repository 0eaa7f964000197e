// The authoritative world: owns every live collection and advances them in a
// fixed stage order. Exactly one task may hold a World; nothing else mutates
// entity state.

use crate::domain::state::{
    BulletSnapshot, PickupSnapshot, PlayerInput, PlayerSnapshot, SimBullet, SimPickup, SimPlayer,
};
use crate::domain::systems::{combat, economy, input, movement};
use crate::domain::tuning::Tuning;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Discrete events produced while stepping, broadcast alongside the snapshot.
#[derive(Debug, Clone)]
pub enum SimEvent {
    PlayerJoined {
        player: PlayerSnapshot,
    },
    PlayerLeft {
        player_id: u64,
    },
    BulletSpawned {
        bullet: BulletSnapshot,
    },
    BulletRemoved {
        bullet_id: u64,
    },
    PlayerHit {
        target_id: u64,
        shooter_id: u64,
        damage: f32,
        energy: f32,
    },
    PlayerDied {
        victim_id: u64,
        killer_id: Option<u64>,
        pickup: PickupSnapshot,
        respawn: PlayerSnapshot,
    },
    MoneyPickedUp {
        player_id: u64,
        pickup_id: u64,
        money: f32,
    },
}

/// Immutable per-tick snapshot of every live entity.
#[derive(Debug, Clone, Default)]
pub struct WorldUpdate {
    pub tick: u64,
    pub players: Vec<PlayerSnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
}

pub struct World {
    tuning: Tuning,
    tick: u64,
    players: Vec<SimPlayer>,
    bullets: Vec<SimBullet>,
    pickups: Vec<SimPickup>,
    next_bullet_id: u64,
    next_pickup_id: u64,
    rng: StdRng,
}

impl World {
    pub fn new(tuning: Tuning) -> Self {
        Self::with_seed(tuning, rand::rngs::OsRng.next_u64())
    }

    /// Seeded constructor so tests get reproducible spawn positions.
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            tick: 0,
            players: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            next_bullet_id: 1,
            next_pickup_id: 1,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }

    pub fn pickup_count(&self) -> usize {
        self.pickups.len()
    }

    /// Spawns and registers a player. Joining twice with the same id is a
    /// no-op that re-reports the existing record.
    pub fn add_player(&mut self, id: u64) -> SimEvent {
        if let Some(existing) = self.players.iter().find(|p| p.id == id) {
            return SimEvent::PlayerJoined {
                player: PlayerSnapshot::from(existing),
            };
        }
        let player = SimPlayer::spawn(id, &self.tuning.world, &self.tuning.player, &mut self.rng);
        let snapshot = PlayerSnapshot::from(&player);
        self.players.push(player);
        SimEvent::PlayerJoined { player: snapshot }
    }

    /// Removes the player's record. Bullets it owns deliberately stay live
    /// until they expire on their own.
    pub fn remove_player(&mut self, id: u64) -> Option<SimEvent> {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        (self.players.len() != before).then_some(SimEvent::PlayerLeft { player_id: id })
    }

    /// Stages an input record in the player's single-slot mailbox. Newest
    /// sequence wins; anything at or below the high-water mark is dropped so
    /// a reordered packet cannot shadow fresher input.
    pub fn post_input(&mut self, id: u64, input: PlayerInput) {
        let Some(p) = self.players.iter_mut().find(|p| p.id == id) else {
            return;
        };
        let newest = p
            .mailbox
            .as_ref()
            .map_or(p.last_seq, |staged| staged.seq.max(p.last_seq));
        if input.seq > newest {
            p.mailbox = Some(input);
        }
    }

    /// Stages a shoot request; the latest request before the tick wins.
    pub fn post_shot(&mut self, id: u64, charge: u8) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
            p.pending_shot = Some(charge);
        }
    }

    /// Runs one fixed logical timestep. Stage order is load-bearing: later
    /// stages read state the earlier ones wrote this same tick.
    pub fn step(&mut self) -> (WorldUpdate, Vec<SimEvent>) {
        self.tick += 1;
        let mut events = Vec::new();

        input::consume_inputs(&mut self.players, &self.tuning.player);
        movement::tick_players(
            &mut self.players,
            &mut self.pickups,
            &mut self.next_pickup_id,
            &self.tuning,
            &mut self.rng,
            &mut events,
        );

        // Invulnerability windows count down between physics and combat, so a
        // window that opened this tick still protects against this tick's
        // bullets.
        for p in &mut self.players {
            if p.invulnerable {
                p.invuln_ticks = p.invuln_ticks.saturating_sub(1);
                if p.invuln_ticks == 0 {
                    p.invulnerable = false;
                }
            }
        }

        combat::fire_pending(
            &mut self.players,
            &mut self.bullets,
            &mut self.next_bullet_id,
            self.tick,
            &self.tuning,
            &mut events,
        );
        combat::tick_bullets(
            &mut self.players,
            &mut self.bullets,
            &mut self.pickups,
            &mut self.next_pickup_id,
            self.tick,
            &self.tuning,
            &mut self.rng,
            &mut events,
        );
        economy::tick_pickups(
            &mut self.players,
            &mut self.pickups,
            &self.tuning,
            &mut events,
        );

        let update = WorldUpdate {
            tick: self.tick,
            players: self.players.iter().map(PlayerSnapshot::from).collect(),
            bullets: self.bullets.iter().map(BulletSnapshot::from).collect(),
            pickups: self.pickups.iter().map(PickupSnapshot::from).collect(),
        };
        (update, events)
    }
}
