// Physics stage: momentum decay, speed caps, integration and lethal walls.
// Runs for every live player every tick, with or without fresh input.

use crate::domain::math;
use crate::domain::state::{SimPickup, SimPlayer};
use crate::domain::systems::respawn;
use crate::domain::tuning::Tuning;
use crate::domain::world::SimEvent;
use rand::rngs::StdRng;
use tracing::warn;

pub fn tick_players(
    players: &mut Vec<SimPlayer>,
    pickups: &mut Vec<SimPickup>,
    next_pickup_id: &mut u64,
    tuning: &Tuning,
    rng: &mut StdRng,
    events: &mut Vec<SimEvent>,
) {
    for i in 0..players.len() {
        {
            let p = &mut players[i];

            p.vx *= tuning.player.momentum_decay;
            p.vy *= tuning.player.momentum_decay;

            // Hard ceiling checked before the ordinary caps so a tampered
            // magnitude is seen and logged rather than silently absorbed.
            // Correct it and move on; never drop the tick or the connection.
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            if speed > tuning.player.speed_hack_cap {
                warn!(player_id = p.id, speed, "velocity above hard cap; clamping");
                (p.vx, p.vy) =
                    math::clamp_magnitude(p.vx, p.vy, tuning.player.speed_hack_cap);
            }

            let cap = if p.boosting {
                tuning.player.boost_max_speed
            } else {
                tuning.player.max_speed
            };
            (p.vx, p.vy) = math::clamp_magnitude(p.vx, p.vy, cap);

            p.x += p.vx;
            p.y += p.vy;

            // Energy regenerates whenever the player is not burning boost.
            if !p.boosting {
                p.energy = (p.energy + tuning.player.energy_regen).min(tuning.player.max_energy);
            }
        }

        // Wall contact, inclusive of the collision radius, is lethal with no
        // killer credited.
        let r = tuning.player.radius;
        let p = &players[i];
        let hit_wall = p.x - r <= 0.0
            || p.x + r >= tuning.world.width
            || p.y - r <= 0.0
            || p.y + r >= tuning.world.height;
        if hit_wall {
            events.push(respawn::kill_player(
                players,
                i,
                None,
                pickups,
                next_pickup_id,
                tuning,
                rng,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fixture() -> (Vec<SimPlayer>, Tuning, StdRng) {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(11);
        let players = vec![SimPlayer::spawn(1, &tuning.world, &tuning.player, &mut rng)];
        (players, tuning, rng)
    }

    fn step(players: &mut Vec<SimPlayer>, tuning: &Tuning, rng: &mut StdRng) -> Vec<SimEvent> {
        let mut pickups = Vec::new();
        let mut next_id = 1;
        let mut events = Vec::new();
        tick_players(players, &mut pickups, &mut next_id, tuning, rng, &mut events);
        events
    }

    #[test]
    fn velocity_decays_without_input() {
        let (mut players, tuning, mut rng) = fixture();
        players[0].x = tuning.world.width / 2.0;
        players[0].y = tuning.world.height / 2.0;
        players[0].vx = 4.0;

        step(&mut players, &tuning, &mut rng);
        assert_eq!(players[0].vx, 4.0 * tuning.player.momentum_decay);
    }

    #[test]
    fn speed_hack_is_clamped_not_rejected() {
        let (mut players, tuning, mut rng) = fixture();
        players[0].x = tuning.world.width / 2.0;
        players[0].y = tuning.world.height / 2.0;
        players[0].boosting = true;
        // Way past anything legitimate input could produce.
        players[0].vx = 500.0;

        let events = step(&mut players, &tuning, &mut rng);
        assert!(events.is_empty());
        let speed = (players[0].vx.powi(2) + players[0].vy.powi(2)).sqrt();
        assert!(speed <= tuning.player.boost_max_speed + 1e-3);
    }

    #[test]
    fn tampered_velocity_lands_on_the_hard_cap() {
        let (mut players, mut tuning, mut rng) = fixture();
        // Hard cap below the boost ceiling so the landing magnitude can only
        // come from the hard-cap clamp, not the ordinary one.
        tuning.player.speed_hack_cap = 6.0;
        players[0].x = tuning.world.width / 2.0;
        players[0].y = tuning.world.height / 2.0;
        players[0].boosting = true;
        players[0].vx = 500.0;

        let events = step(&mut players, &tuning, &mut rng);
        assert!(events.is_empty());
        let speed = (players[0].vx.powi(2) + players[0].vy.powi(2)).sqrt();
        assert!((speed - tuning.player.speed_hack_cap).abs() < 1e-3);
    }

    #[test]
    fn normal_cap_is_lower_than_boost_cap() {
        let (mut players, tuning, mut rng) = fixture();
        players[0].x = tuning.world.width / 2.0;
        players[0].y = tuning.world.height / 2.0;
        players[0].vx = 20.0;

        step(&mut players, &tuning, &mut rng);
        let speed = (players[0].vx.powi(2) + players[0].vy.powi(2)).sqrt();
        assert!(speed <= tuning.player.max_speed + 1e-3);
    }

    #[test]
    fn wall_contact_kills_exactly_on_crossing() {
        let (mut players, tuning, mut rng) = fixture();
        let r = tuning.player.radius;
        players[0].y = tuning.world.height / 2.0;
        // One pixel of clearance, drifting toward the left wall at a pace that
        // outruns momentum decay for the few ticks under test.
        players[0].x = r + 1.0;
        players[0].vx = -0.4;

        let events = step(&mut players, &tuning, &mut rng);
        assert!(events.is_empty(), "died before touching the wall");

        // Restore the decayed velocity so the next step crosses.
        players[0].vx = -0.7;
        let events = step(&mut players, &tuning, &mut rng);
        assert_eq!(events.len(), 1);
        match &events[0] {
            SimEvent::PlayerDied { killer_id, .. } => assert_eq!(*killer_id, None),
            other => panic!("unexpected event: {other:?}"),
        }
        // Respawned inside the arena, not at the wall.
        assert!(players[0].x - r > 0.0);
        assert!(players[0].x + r < tuning.world.width);
    }

    #[test]
    fn energy_regenerates_only_while_not_boosting() {
        let (mut players, tuning, mut rng) = fixture();
        players[0].x = tuning.world.width / 2.0;
        players[0].y = tuning.world.height / 2.0;
        players[0].energy = 50.0;
        players[0].boosting = true;
        step(&mut players, &tuning, &mut rng);
        assert_eq!(players[0].energy, 50.0);

        players[0].boosting = false;
        step(&mut players, &tuning, &mut rng);
        assert_eq!(players[0].energy, 50.0 + tuning.player.energy_regen);

        // Regen never overshoots the maximum.
        players[0].energy = tuning.player.max_energy - 0.1;
        step(&mut players, &tuning, &mut rng);
        assert_eq!(players[0].energy, tuning.player.max_energy);
    }
}
