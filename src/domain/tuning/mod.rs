// Gameplay tuning, separate from runtime/server configuration.

pub mod pickup;
pub mod player;
pub mod weapon;
pub mod world;

pub use pickup::PickupTuning;
pub use player::PlayerTuning;
pub use weapon::{ChargeProfile, WeaponTuning};
pub use world::WorldTuning;

/// Full tuning set handed to the simulation and echoed to clients on connect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub pickup: PickupTuning,
}
