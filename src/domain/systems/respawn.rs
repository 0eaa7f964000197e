// Death/respawn transition: alive -> dead -> alive within a single tick.

use crate::domain::state::{PickupSnapshot, PlayerSnapshot, SimPickup, SimPlayer};
use crate::domain::tuning::Tuning;
use crate::domain::world::SimEvent;
use rand::rngs::StdRng;
use tracing::info;

/// Display multiplier derived from a killer's streak. Step function only;
/// it never feeds back into currency math.
pub fn bounty_multiplier(streak: u32) -> f32 {
    match streak {
        0 => 1.0,
        1..=2 => 1.5,
        3..=4 => 2.0,
        _ => 3.0,
    }
}

/// Applies the full death transition for the player at `victim_idx`:
/// drops the victim's money as a pickup where they died, credits the killer's
/// streak if one is named and still connected, then overwrites the victim
/// record in place with a fresh spawn.
///
/// Kill streak, bounty multiplier and the input sequence watermark belong to
/// the connection rather than the life, so they carry over to the respawn.
pub fn kill_player(
    players: &mut [SimPlayer],
    victim_idx: usize,
    killer_id: Option<u64>,
    pickups: &mut Vec<SimPickup>,
    next_pickup_id: &mut u64,
    tuning: &Tuning,
    rng: &mut StdRng,
) -> SimEvent {
    let (drop_x, drop_y, amount) = {
        let v = &players[victim_idx];
        (v.x, v.y, v.money)
    };
    let pickup = SimPickup {
        id: *next_pickup_id,
        x: drop_x,
        y: drop_y,
        radius: tuning.pickup.radius,
        amount,
    };
    *next_pickup_id = next_pickup_id.wrapping_add(1);
    let pickup_snapshot = PickupSnapshot::from(&pickup);
    pickups.push(pickup);

    if let Some(killer) = killer_id {
        if let Some(k) = players.iter_mut().find(|p| p.id == killer) {
            k.kill_streak += 1;
            k.bounty_multiplier = bounty_multiplier(k.kill_streak);
        }
    }

    let victim = &players[victim_idx];
    let victim_id = victim.id;
    let (streak, multiplier, last_seq) =
        (victim.kill_streak, victim.bounty_multiplier, victim.last_seq);

    let mut fresh = SimPlayer::spawn(victim_id, &tuning.world, &tuning.player, rng);
    fresh.kill_streak = streak;
    fresh.bounty_multiplier = multiplier;
    fresh.last_seq = last_seq;
    let respawn = PlayerSnapshot::from(&fresh);
    players[victim_idx] = fresh;

    info!(victim_id, killer_id, dropped = amount, "player died");

    SimEvent::PlayerDied {
        victim_id,
        killer_id,
        pickup: pickup_snapshot,
        respawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::SimPlayer;
    use rand::SeedableRng;

    fn fixture(ids: &[u64]) -> (Vec<SimPlayer>, Tuning, StdRng) {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(42);
        let players = ids
            .iter()
            .map(|&id| SimPlayer::spawn(id, &tuning.world, &tuning.player, &mut rng))
            .collect();
        (players, tuning, rng)
    }

    #[test]
    fn bounty_step_function_boundaries() {
        assert_eq!(bounty_multiplier(0), 1.0);
        assert_eq!(bounty_multiplier(1), 1.5);
        assert_eq!(bounty_multiplier(2), 1.5);
        assert_eq!(bounty_multiplier(3), 2.0);
        assert_eq!(bounty_multiplier(4), 2.0);
        assert_eq!(bounty_multiplier(5), 3.0);
        assert_eq!(bounty_multiplier(40), 3.0);
    }

    #[test]
    fn dropped_pickup_carries_full_money() {
        let (mut players, tuning, mut rng) = fixture(&[1, 2]);
        players[0].money = 87.5;
        let mut pickups = Vec::new();
        let mut next_id = 1;

        let ev = kill_player(
            &mut players,
            0,
            Some(2),
            &mut pickups,
            &mut next_id,
            &tuning,
            &mut rng,
        );

        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].amount, 87.5);
        match ev {
            SimEvent::PlayerDied {
                victim_id,
                killer_id,
                pickup,
                respawn,
            } => {
                assert_eq!(victim_id, 1);
                assert_eq!(killer_id, Some(2));
                assert_eq!(pickup.amount, 87.5);
                assert_eq!(respawn.money, tuning.player.starting_money);
                assert!(respawn.invulnerable);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn killer_streak_increments_and_derives_multiplier() {
        let (mut players, tuning, mut rng) = fixture(&[1, 2]);
        let mut pickups = Vec::new();
        let mut next_id = 1;

        for expected in [(1, 1.5), (2, 1.5), (3, 2.0), (4, 2.0), (5, 3.0)] {
            kill_player(
                &mut players,
                0,
                Some(2),
                &mut pickups,
                &mut next_id,
                &tuning,
                &mut rng,
            );
            let killer = players.iter().find(|p| p.id == 2).unwrap();
            assert_eq!(killer.kill_streak, expected.0);
            assert_eq!(killer.bounty_multiplier, expected.1);
        }
    }

    #[test]
    fn victim_streak_survives_own_death() {
        let (mut players, tuning, mut rng) = fixture(&[1, 2]);
        players[0].kill_streak = 4;
        players[0].bounty_multiplier = bounty_multiplier(4);
        let mut pickups = Vec::new();
        let mut next_id = 1;

        kill_player(
            &mut players,
            0,
            Some(2),
            &mut pickups,
            &mut next_id,
            &tuning,
            &mut rng,
        );

        assert_eq!(players[0].kill_streak, 4);
        assert_eq!(players[0].bounty_multiplier, 2.0);
        // Everything else is reset.
        assert_eq!(players[0].money, tuning.player.starting_money);
        assert_eq!(players[0].energy, tuning.player.max_energy);
        assert!(players[0].invulnerable);
    }

    #[test]
    fn missing_killer_is_a_noop_credit() {
        let (mut players, tuning, mut rng) = fixture(&[1]);
        let mut pickups = Vec::new();
        let mut next_id = 1;

        // Killer id 99 is no longer in the live set; the kill still resolves.
        let ev = kill_player(
            &mut players,
            0,
            Some(99),
            &mut pickups,
            &mut next_id,
            &tuning,
            &mut rng,
        );
        assert!(matches!(ev, SimEvent::PlayerDied { .. }));
        assert_eq!(pickups.len(), 1);
    }
}
