// Input stage: consumes at most one staged input per player per tick and
// applies the held input record to velocity, boost state and facing angle.

use crate::domain::math;
use crate::domain::state::SimPlayer;
use crate::domain::tuning::PlayerTuning;

pub fn consume_inputs(players: &mut [SimPlayer], tuning: &PlayerTuning) {
    for p in players.iter_mut() {
        // Promote the mailbox record if it is newer than what we last applied.
        // Stale or duplicate sequence numbers are dropped silently.
        if let Some(fresh) = p.mailbox.take() {
            if fresh.seq > p.last_seq {
                p.last_seq = fresh.seq;
                p.last_input = fresh;
            }
        }

        let input = p.last_input;

        // Direction booleans become a unit vector so diagonals carry no
        // speed advantage.
        let mut dx = 0.0;
        let mut dy = 0.0;
        if input.up {
            dy -= 1.0;
        }
        if input.down {
            dy += 1.0;
        }
        if input.left {
            dx -= 1.0;
        }
        if input.right {
            dx += 1.0;
        }
        let (dx, dy) = math::normalize(dx, dy);
        p.vx += dx * tuning.accel;
        p.vy += dy * tuning.accel;

        // Boost only engages while there is energy left to burn.
        if input.boost && p.energy > 0.0 {
            p.boosting = true;
            p.energy = (p.energy - tuning.boost_drain).max(0.0);
        } else {
            p.boosting = false;
        }

        // Client-supplied angle is trusted as-is when present.
        if let Some(angle) = input.angle {
            p.angle = angle;
        }
    }
}
