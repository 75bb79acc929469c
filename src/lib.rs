//! Fruit Fall - A falling-fruit catching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, difficulty, weather, collisions)
//! - `settings`: Presentation preferences (ambient particle budget)
//! - `tuning`: Data-driven game balance

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step in milliseconds (50 Hz, matches the fall cadence)
    pub const STEP_MS: u64 = 20;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = STEP_MS as f32 / 1000.0;
    /// Simulation steps per real second
    pub const STEPS_PER_SECOND: f32 = 1000.0 / STEP_MS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Falling object edge length (objects are square)
    pub const OBJECT_SIZE: f32 = 50.0;
    /// Keep spawns this far from either side wall
    pub const SPAWN_EDGE_MARGIN: f32 = 10.0;

    /// Paddle (basket) defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 40.0;
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    /// Autopilot paddle speed (pixels per second)
    pub const PADDLE_MAX_SPEED: f32 = 900.0;

    /// Session
    pub const MAX_MISSES: u32 = 10;
    pub const POINTS_PER_CATCH: u64 = 1;

    /// Difficulty curve
    pub const BASE_FALL_SPEED: f32 = 1.5;
    pub const LEVEL_MILESTONE: u32 = 10;
    pub const LEVEL_SPEED_STEP: f32 = 0.2;
    pub const WAVE_SIZE_START_LEVEL: u32 = 5;
    pub const WAVE_SIZE_LEVEL_STEP: u32 = 2;
    pub const MAX_WAVE_SIZE: u32 = 5;
    pub const BASE_WAVE_INTERVAL_MS: u64 = 1500;
    pub const LEVEL_INTERVAL_STEP_MS: u64 = 50;
    pub const MIN_WAVE_INTERVAL_MS: u64 = 500;
    pub const TIME_MILESTONE_SECS: u32 = 10;
    pub const TIME_SPEED_STEP: f32 = 0.05;
    pub const TIME_INTERVAL_STEP_MS: u64 = 20;

    /// Delay between objects of the same wave
    pub const INTRA_WAVE_DELAY_MS: u64 = 80;

    /// Environment cycle
    pub const ENVIRONMENT_CHECK_SECS: u32 = 5;
    pub const PHASE_DWELL_SECS: u32 = 30;
    pub const RAIN_DROPS: usize = 200;
    pub const SNOW_FLAKES: usize = 120;
    pub const LIGHTNING_MIN_MS: u64 = 1500;
    pub const LIGHTNING_MAX_MS: u64 = 5000;
    pub const FLASH_MS: u64 = 200;

    /// Longest delay any schedule accepts (one hour)
    pub const MAX_SCHEDULE_MS: u64 = 3_600_000;
    pub const MAX_SCHEDULE_SECS: u32 = (MAX_SCHEDULE_MS / 1000) as u32;
}

/// Clamp a left edge so a span of `extent` stays inside `[0, limit]`.
///
/// Degenerate limits (span wider than the field) pin to the minimum edge.
#[inline]
pub fn clamp_span(start: f32, extent: f32, limit: f32) -> f32 {
    let max_start = (limit - extent).max(0.0);
    start.clamp(0.0, max_start)
}
