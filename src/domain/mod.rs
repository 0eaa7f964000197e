// Domain layer: core simulation types and rules.

pub mod math;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

pub use state::{
    BulletSnapshot, PickupSnapshot, PlayerInput, PlayerSnapshot, SimBullet, SimPickup, SimPlayer,
};
pub use world::{SimEvent, World, WorldUpdate};
