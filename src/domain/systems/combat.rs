// Combat stage: shoot validation and spawn, then bullet advance, lifetime,
// bounds and player collision with single-hit resolution.

use crate::domain::math;
use crate::domain::state::{BulletSnapshot, SimBullet, SimPickup, SimPlayer};
use crate::domain::systems::respawn;
use crate::domain::tuning::Tuning;
use crate::domain::world::SimEvent;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Consumes each player's pending shoot request. Requests the player cannot
/// afford are dropped silently; the client learns nothing.
pub fn fire_pending(
    players: &mut [SimPlayer],
    bullets: &mut Vec<SimBullet>,
    next_bullet_id: &mut u64,
    tick: u64,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
) {
    for p in players.iter_mut() {
        let Some(requested) = p.pending_shot.take() else {
            continue;
        };
        let charge = tuning.weapon.clamp_charge(requested);
        let profile = tuning.weapon.profile(charge);

        if p.energy < profile.cost {
            debug!(player_id = p.id, charge, energy = p.energy, "shot rejected");
            continue;
        }
        p.energy -= profile.cost;

        // Spawn ahead of the muzzle so the bullet starts clear of the shooter.
        let (dx, dy) = (p.angle.cos(), p.angle.sin());
        let offset = tuning.player.radius + profile.radius + tuning.weapon.muzzle_gap;
        let bullet = SimBullet {
            id: *next_bullet_id,
            owner_id: p.id,
            x: p.x + dx * offset,
            y: p.y + dy * offset,
            vx: dx * profile.speed,
            vy: dy * profile.speed,
            radius: profile.radius,
            damage: profile.damage,
            charge,
            spawn_tick: tick,
        };
        *next_bullet_id = next_bullet_id.wrapping_add(1);

        events.push(SimEvent::BulletSpawned {
            bullet: BulletSnapshot::from(&bullet),
        });
        bullets.push(bullet);
    }
}

/// Advances every live bullet: lifetime expiry, movement, arena exit, then
/// collision against players in stable insertion order. A bullet resolves at
/// most one hit and is removed immediately after.
pub fn tick_bullets(
    players: &mut Vec<SimPlayer>,
    bullets: &mut Vec<SimBullet>,
    pickups: &mut Vec<SimPickup>,
    next_pickup_id: &mut u64,
    tick: u64,
    tuning: &Tuning,
    rng: &mut StdRng,
    events: &mut Vec<SimEvent>,
) {
    // Lifetime first: a bullet older than its ceiling never moves again.
    bullets.retain(|b| {
        if tick.saturating_sub(b.spawn_tick) > tuning.weapon.lifetime_ticks {
            events.push(SimEvent::BulletRemoved { bullet_id: b.id });
            false
        } else {
            true
        }
    });

    // Integrate, then drop anything that left the arena rectangle.
    bullets.retain_mut(|b| {
        b.x += b.vx;
        b.y += b.vy;
        let inside =
            b.x >= 0.0 && b.x <= tuning.world.width && b.y >= 0.0 && b.y <= tuning.world.height;
        if !inside {
            events.push(SimEvent::BulletRemoved { bullet_id: b.id });
        }
        inside
    });

    // Collision pass. Owners and invulnerable players are never candidates.
    let mut spent: Vec<u64> = Vec::new();
    for bi in 0..bullets.len() {
        let (bullet_id, owner_id, bx, by, br, damage) = {
            let b = &bullets[bi];
            (b.id, b.owner_id, b.x, b.y, b.radius, b.damage)
        };

        let hit = players.iter().position(|p| {
            p.id != owner_id
                && !p.invulnerable
                && math::distance(bx, by, p.x, p.y) < br + tuning.player.radius
        });
        let Some(pi) = hit else {
            continue;
        };

        let target = &mut players[pi];
        // Damage is applied unclamped; the death check below restores the
        // energy invariant before the stage ends.
        target.energy -= damage;
        let target_id = target.id;
        let remaining = target.energy;
        info!(
            target_id,
            shooter_id = owner_id,
            bullet_id,
            energy = remaining,
            "player hit"
        );
        events.push(SimEvent::PlayerHit {
            target_id,
            shooter_id: owner_id,
            damage,
            energy: remaining,
        });

        if remaining <= 0.0 {
            events.push(respawn::kill_player(
                players,
                pi,
                Some(owner_id),
                pickups,
                next_pickup_id,
                tuning,
                rng,
            ));
        }

        spent.push(bullet_id);
    }

    bullets.retain(|b| {
        if spent.contains(&b.id) {
            events.push(SimEvent::BulletRemoved { bullet_id: b.id });
            false
        } else {
            true
        }
    });
}
