// Use cases layer: application workflows for the arena server.

pub mod game;
pub mod types;

pub use game::world_task;
pub use types::{GameEvent, WorldStats};
