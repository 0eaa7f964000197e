// Per-tick simulation stages, executed in a fixed order by the world step.

pub mod combat;
pub mod economy;
pub mod input;
pub mod movement;
pub mod respawn;
