//! Data-driven game balance
//!
//! Every number the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a JSON file can override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::EnvironmentPhase;

/// Play field and paddle geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    pub width: f32,
    pub height: f32,
    pub object_size: f32,
    pub spawn_edge_margin: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_margin: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            object_size: OBJECT_SIZE,
            spawn_edge_margin: SPAWN_EDGE_MARGIN,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
        }
    }
}

/// Scoring and game-over threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub max_misses: u32,
    pub points_per_catch: u64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            max_misses: MAX_MISSES,
            points_per_catch: POINTS_PER_CATCH,
        }
    }
}

/// Difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// Fall speed at level 1 (pixels per step)
    pub base_fall_speed: f32,
    /// Catches per level
    pub level_milestone: u32,
    pub level_speed_step: f32,
    /// First level that drops more than one object per wave
    pub wave_size_start_level: u32,
    /// Levels per extra object once waves start growing
    pub wave_size_level_step: u32,
    pub max_wave_size: u32,
    pub base_wave_interval_ms: u64,
    pub level_interval_step_ms: u64,
    pub min_wave_interval_ms: u64,
    /// Seconds between time-based speed bumps
    pub time_milestone_secs: u32,
    pub time_speed_step: f32,
    pub time_interval_step_ms: u64,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            base_fall_speed: BASE_FALL_SPEED,
            level_milestone: LEVEL_MILESTONE,
            level_speed_step: LEVEL_SPEED_STEP,
            wave_size_start_level: WAVE_SIZE_START_LEVEL,
            wave_size_level_step: WAVE_SIZE_LEVEL_STEP,
            max_wave_size: MAX_WAVE_SIZE,
            base_wave_interval_ms: BASE_WAVE_INTERVAL_MS,
            level_interval_step_ms: LEVEL_INTERVAL_STEP_MS,
            min_wave_interval_ms: MIN_WAVE_INTERVAL_MS,
            time_milestone_secs: TIME_MILESTONE_SECS,
            time_speed_step: TIME_SPEED_STEP,
            time_interval_step_ms: TIME_INTERVAL_STEP_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    pub intra_wave_delay_ms: u64,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            intra_wave_delay_ms: INTRA_WAVE_DELAY_MS,
        }
    }
}

/// One entry of the weather cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDwell {
    pub phase: EnvironmentPhase,
    pub dwell_secs: u32,
}

impl PhaseDwell {
    pub const fn new(phase: EnvironmentPhase, dwell_secs: u32) -> Self {
        Self { phase, dwell_secs }
    }
}

/// Weather / time-of-day cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentTuning {
    pub check_period_secs: u32,
    pub phases: Vec<PhaseDwell>,
    pub rain_drops: usize,
    pub snow_flakes: usize,
    pub lightning_min_ms: u64,
    pub lightning_max_ms: u64,
    pub flash_ms: u64,
}

impl Default for EnvironmentTuning {
    fn default() -> Self {
        Self {
            check_period_secs: ENVIRONMENT_CHECK_SECS,
            phases: EnvironmentPhase::ALL
                .iter()
                .map(|&phase| PhaseDwell::new(phase, PHASE_DWELL_SECS))
                .collect(),
            rain_drops: RAIN_DROPS,
            snow_flakes: SNOW_FLAKES,
            lightning_min_ms: LIGHTNING_MIN_MS,
            lightning_max_ms: LIGHTNING_MAX_MS,
            flash_ms: FLASH_MS,
        }
    }
}

impl EnvironmentTuning {
    /// Total length of one weather cycle in seconds
    pub fn cycle_secs(&self) -> u32 {
        self.phases
            .iter()
            .fold(0u32, |total, p| total.saturating_add(p.dwell_secs))
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field: FieldTuning,
    pub session: SessionTuning,
    pub difficulty: DifficultyTuning,
    pub spawner: SpawnerTuning,
    pub environment: EnvironmentTuning,
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitize())
    }

    /// Read and parse a tuning file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(std::io::Error::from)
    }

    /// Read a tuning file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}: {})", path.display(), err);
                Self::default()
            }
        }
    }

    /// Clamp every value into a range the simulation can run with
    pub fn sanitize(mut self) -> Self {
        let f = &mut self.field;
        f.width = f.width.max(1.0);
        f.height = f.height.max(1.0);
        f.object_size = f.object_size.max(1.0);
        f.spawn_edge_margin = f.spawn_edge_margin.max(0.0);
        f.paddle_width = f.paddle_width.clamp(1.0, f.width);
        f.paddle_height = f.paddle_height.max(1.0);
        f.paddle_bottom_margin = f.paddle_bottom_margin.clamp(0.0, f.height);

        let s = &mut self.session;
        s.max_misses = s.max_misses.max(1);

        let d = &mut self.difficulty;
        d.base_fall_speed = d.base_fall_speed.max(0.01);
        d.level_milestone = d.level_milestone.max(1);
        d.level_speed_step = d.level_speed_step.max(0.0);
        d.wave_size_start_level = d.wave_size_start_level.max(2);
        d.wave_size_level_step = d.wave_size_level_step.max(1);
        d.max_wave_size = d.max_wave_size.max(1);
        d.min_wave_interval_ms = d.min_wave_interval_ms.clamp(STEP_MS, MAX_SCHEDULE_MS);
        d.base_wave_interval_ms = d
            .base_wave_interval_ms
            .clamp(d.min_wave_interval_ms, MAX_SCHEDULE_MS);
        d.time_milestone_secs = d.time_milestone_secs.max(1);
        d.time_speed_step = d.time_speed_step.max(0.0);

        let sp = &mut self.spawner;
        sp.intra_wave_delay_ms = sp.intra_wave_delay_ms.min(MAX_SCHEDULE_MS);

        let e = &mut self.environment;
        e.check_period_secs = e.check_period_secs.clamp(1, MAX_SCHEDULE_SECS);
        e.phases.retain(|p| p.dwell_secs > 0);
        for p in &mut e.phases {
            p.dwell_secs = p.dwell_secs.min(MAX_SCHEDULE_SECS);
        }
        if e.phases.is_empty() {
            log::warn!("Empty weather cycle, using the default one");
            e.phases = EnvironmentTuning::default().phases;
        }
        e.lightning_min_ms = e.lightning_min_ms.clamp(STEP_MS, MAX_SCHEDULE_MS);
        e.lightning_max_ms = e.lightning_max_ms.clamp(e.lightning_min_ms, MAX_SCHEDULE_MS);
        e.flash_ms = e.flash_ms.clamp(STEP_MS, MAX_SCHEDULE_MS);

        self
    }
}
