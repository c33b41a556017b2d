use std::env;

use crate::domain::state::Vec3;

// Runtime settings (env-driven) and gameplay tuning (constants).

pub fn match_id() -> String {
    env::var("ARENA_MATCH_ID").unwrap_or_else(|_| "public_arena_1".to_string())
}

pub fn username() -> String {
    env::var("ARENA_USERNAME").unwrap_or_else(|_| "guest".to_string())
}

// Outbound publish gate: at most one transform write per window.
pub const PUBLISH_MIN_INTERVAL_MS: u64 = 100;
// Exponential smoothing rate for remote proxy interpolation.
pub const SMOOTHING_RATE: f32 = 10.0;

pub const SHOT_DAMAGE: i32 = 10;
pub const LETHAL_HP_THRESHOLD: i32 = 10;
pub const MAX_HP: i32 = 100;
pub const WIN_KILLS: i32 = 15;
pub const RESPAWN_POSITION: Vec3 = Vec3::new(0.0, 10.0, 0.0);
pub const KILL_FEED_TTL_MS: u64 = 2_000;

pub const EVENT_CHANNEL_CAPACITY: usize = 256;
