/// One charge level's projectile profile.
///
/// Higher levels trade speed for radius and damage, and cost more energy.
#[derive(Debug, Clone, Copy)]
pub struct ChargeProfile {
    /// Muzzle speed in pixels per tick.
    pub speed: f32,

    /// World-space collision radius in pixels.
    pub radius: f32,

    /// Energy removed from the target on hit.
    pub damage: f32,

    /// Energy debited from the shooter when the shot is accepted.
    pub cost: f32,
}

/// Gameplay tuning for weapons and projectiles.
#[derive(Debug, Clone, Copy)]
pub struct WeaponTuning {
    /// Profiles indexed by charge level 0..=2.
    pub profiles: [ChargeProfile; 3],

    /// Ticks a bullet may live before it is despawned.
    pub lifetime_ticks: u64,

    /// Extra spawn clearance beyond the player and bullet radii.
    pub muzzle_gap: f32,
}

impl WeaponTuning {
    /// Clamps an untrusted charge level to a known profile index.
    /// Unrecognized levels fall back to level 0.
    pub fn clamp_charge(&self, charge: u8) -> u8 {
        if (charge as usize) < self.profiles.len() {
            charge
        } else {
            0
        }
    }

    pub fn profile(&self, charge: u8) -> &ChargeProfile {
        &self.profiles[self.clamp_charge(charge) as usize]
    }
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            profiles: [
                ChargeProfile {
                    speed: 12.0,
                    radius: 4.0,
                    damage: 10.0,
                    cost: 5.0,
                },
                ChargeProfile {
                    speed: 10.0,
                    radius: 7.0,
                    damage: 20.0,
                    cost: 10.0,
                },
                ChargeProfile {
                    speed: 8.0,
                    radius: 11.0,
                    damage: 35.0,
                    cost: 15.0,
                },
            ],
            lifetime_ticks: 300,
            muzzle_gap: 4.0,
        }
    }
}
