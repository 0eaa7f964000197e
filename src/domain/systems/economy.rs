// Economy stage: magnetic drift of dropped currency and pickup collection.

use crate::domain::math;
use crate::domain::state::{SimPickup, SimPlayer};
use crate::domain::tuning::Tuning;
use crate::domain::world::SimEvent;
use tracing::info;

/// Player-outer, pickup-inner scan. A pickup inside the magnet radius drifts
/// toward the player; once circles overlap the full amount transfers and the
/// pickup is removed. There is no ownership: anyone may collect any drop,
/// including their own. When several players attract one pickup, the first
/// collector in iteration order wins.
pub fn tick_pickups(
    players: &mut [SimPlayer],
    pickups: &mut Vec<SimPickup>,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
) {
    let collect_range = tuning.player.radius + tuning.pickup.radius;

    for p in players.iter_mut() {
        let mut i = 0;
        while i < pickups.len() {
            let m = &mut pickups[i];
            let dist = math::distance(p.x, p.y, m.x, m.y);

            if dist < collect_range {
                p.money += m.amount;
                info!(
                    player_id = p.id,
                    pickup_id = m.id,
                    amount = m.amount,
                    money = p.money,
                    "money picked up"
                );
                events.push(SimEvent::MoneyPickedUp {
                    player_id: p.id,
                    pickup_id: m.id,
                    money: p.money,
                });
                pickups.remove(i);
                // Do not advance: the next pickup shifted into slot i.
            } else if dist < tuning.pickup.magnet_radius {
                let (dx, dy) = math::normalize(p.x - m.x, p.y - m.y);
                m.x += dx * tuning.pickup.pull_speed;
                m.y += dy * tuning.pickup.pull_speed;
                i += 1;
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn player_at(id: u64, x: f32, y: f32, tuning: &Tuning) -> SimPlayer {
        let mut rng = StdRng::seed_from_u64(id);
        let mut p = SimPlayer::spawn(id, &tuning.world, &tuning.player, &mut rng);
        p.x = x;
        p.y = y;
        p
    }

    fn pickup_at(id: u64, x: f32, y: f32, amount: f32, tuning: &Tuning) -> SimPickup {
        SimPickup {
            id,
            x,
            y,
            radius: tuning.pickup.radius,
            amount,
        }
    }

    #[test]
    fn collection_transfers_full_amount_and_removes_one_pickup() {
        let tuning = Tuning::default();
        let mut players = vec![player_at(1, 500.0, 500.0, &tuning)];
        players[0].money = 2.0;
        let mut pickups = vec![pickup_at(1, 505.0, 500.0, 12.5, &tuning)];

        let mut events = Vec::new();
        tick_pickups(&mut players, &mut pickups, &tuning, &mut events);

        assert_eq!(players[0].money, 14.5);
        assert!(pickups.is_empty());
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            SimEvent::MoneyPickedUp { player_id: 1, pickup_id: 1, .. }
        ));
    }

    #[test]
    fn two_pickups_in_magnet_range_both_drift_but_only_overlap_collects() {
        let tuning = Tuning::default();
        let mut players = vec![player_at(1, 500.0, 500.0, &tuning)];
        // One overlapping, one inside the magnet radius but out of reach.
        let mut pickups = vec![
            pickup_at(1, 510.0, 500.0, 3.0, &tuning),
            pickup_at(2, 580.0, 500.0, 4.0, &tuning),
        ];
        let far_start = pickups[1].x;

        let mut events = Vec::new();
        tick_pickups(&mut players, &mut pickups, &tuning, &mut events);

        assert_eq!(events.len(), 1);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].id, 2);
        // The remaining pickup drifted toward the player at the pull speed.
        assert_eq!(pickups[0].x, far_start - tuning.pickup.pull_speed);
    }

    #[test]
    fn pickups_outside_magnet_radius_do_not_move() {
        let tuning = Tuning::default();
        let mut players = vec![player_at(1, 500.0, 500.0, &tuning)];
        let mut pickups = vec![pickup_at(1, 900.0, 500.0, 3.0, &tuning)];

        let mut events = Vec::new();
        tick_pickups(&mut players, &mut pickups, &tuning, &mut events);
        assert!(events.is_empty());
        assert_eq!(pickups[0].x, 900.0);
    }

    #[test]
    fn any_player_may_collect_including_the_dropper() {
        let tuning = Tuning::default();
        // Dropper stands on their own drop.
        let mut players = vec![player_at(7, 640.0, 640.0, &tuning)];
        players[0].money = tuning.player.starting_money;
        let mut pickups = vec![pickup_at(1, 640.0, 640.0, 50.0, &tuning)];

        tick_pickups(&mut players, &mut pickups, &tuning, &mut Vec::new());
        assert_eq!(players[0].money, tuning.player.starting_money + 50.0);
    }
}
