//! Difficulty curve
//!
//! Two independent ramps feed the same state: catches push the level up
//! (bigger steps), and the session clock adds small speed bumps on a fixed
//! period. Both tighten the wave interval toward the same floor.

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyTuning;

/// Current difficulty, read by the spawner for every wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub level: u32,
    /// Pixels per step for newly spawned objects
    pub fall_speed: f32,
    /// Objects per wave
    pub wave_size: u32,
    /// Pause between waves
    pub wave_interval_ms: u64,
}

impl DifficultyState {
    pub fn initial(tuning: &DifficultyTuning) -> Self {
        Self {
            level: 1,
            fall_speed: tuning.base_fall_speed,
            wave_size: 1,
            wave_interval_ms: tuning
                .base_wave_interval_ms
                .max(tuning.min_wave_interval_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DifficultyController {
    tuning: DifficultyTuning,
    state: DifficultyState,
    /// Time-based bumps applied so far
    time_milestones: u32,
}

impl DifficultyController {
    pub fn new(tuning: DifficultyTuning) -> Self {
        let state = DifficultyState::initial(&tuning);
        Self {
            tuning,
            state,
            time_milestones: 0,
        }
    }

    pub fn state(&self) -> &DifficultyState {
        &self.state
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn reset(&mut self) {
        self.state = DifficultyState::initial(&self.tuning);
        self.time_milestones = 0;
    }

    /// Level implied by a catch count
    pub fn level_for_catches(&self, catch_count: u32) -> u32 {
        1 + catch_count / self.tuning.level_milestone
    }

    /// Wave size implied by a level, before the monotonic guard
    fn wave_size_for_level(&self, level: u32) -> u32 {
        let t = &self.tuning;
        if level < t.wave_size_start_level {
            return 1;
        }
        let past = level - (t.wave_size_start_level - 1);
        (1 + past / t.wave_size_level_step).min(t.max_wave_size)
    }

    fn tighten_interval(&mut self, step_ms: u64) {
        self.state.wave_interval_ms = self
            .state
            .wave_interval_ms
            .saturating_sub(step_ms)
            .max(self.tuning.min_wave_interval_ms);
    }

    fn level_up(&mut self) {
        self.state.level += 1;
        self.state.fall_speed += self.tuning.level_speed_step;

        let size = self.wave_size_for_level(self.state.level);
        self.state.wave_size = self.state.wave_size.max(size).min(self.tuning.max_wave_size);

        self.tighten_interval(self.tuning.level_interval_step_ms);

        log::info!(
            "Level {}: speed {:.2}, {} per wave, {}ms between waves",
            self.state.level,
            self.state.fall_speed,
            self.state.wave_size,
            self.state.wave_interval_ms
        );
    }

    /// Apply catch milestones. Returns the number of levels gained.
    pub fn on_catch(&mut self, catch_count: u32) -> u32 {
        let target = self.level_for_catches(catch_count);
        let mut gained = 0;
        while self.state.level < target {
            self.level_up();
            gained += 1;
        }
        gained
    }

    /// Apply time milestones. Returns the number of bumps applied.
    pub fn on_time_elapsed(&mut self, elapsed_secs: u32) -> u32 {
        let due = elapsed_secs / self.tuning.time_milestone_secs;
        let mut applied = 0;
        while self.time_milestones < due {
            self.time_milestones += 1;
            self.state.fall_speed += self.tuning.time_speed_step;
            self.tighten_interval(self.tuning.time_interval_step_ms);
            applied += 1;
        }
        if applied > 0 {
            log::debug!(
                "Time ramp at {}s: speed {:.2}, {}ms between waves",
                elapsed_secs,
                self.state.fall_speed,
                self.state.wave_interval_ms
            );
        }
        applied
    }
}
