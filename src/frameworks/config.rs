use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("ARENA_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn tick_rate() -> u32 {
    env::var("ARENA_TICK_RATE")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&rate| rate > 0)
        .unwrap_or(60)
}

pub fn tick_interval(tick_rate: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(tick_rate))
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;
pub const EVENT_BROADCAST_CAPACITY: usize = 1024;
