//! Wave spawner
//!
//! A single self-rescheduling timer drives waves: each firing drops one
//! object, spaced by a short intra-wave delay; after the last object of a
//! wave the timer waits the full wave interval. Wave size and interval are
//! read fresh from the difficulty state at every decision point.

use rand::Rng;

use super::difficulty::DifficultyState;
use super::state::{FallingObject, FruitKind};
use super::timer::Timer;
use crate::tuning::{FieldTuning, SpawnerTuning};

/// Pick a random fruit and start position for a new object
pub fn create_object(
    id: u32,
    difficulty: &DifficultyState,
    field: &FieldTuning,
    rng: &mut impl Rng,
) -> FallingObject {
    let kind = FruitKind::ALL[rng.random_range(0..FruitKind::ALL.len())];

    let range = field.width - field.object_size - 2.0 * field.spawn_edge_margin;
    let x = if range >= 0.0 {
        field.spawn_edge_margin + rng.random::<f32>() * range
    } else {
        // Field too narrow for the margin; pin to the left edge
        0.0
    };

    FallingObject::new(id, kind, x, difficulty.fall_speed)
}

#[derive(Debug, Clone)]
pub struct Spawner {
    tuning: SpawnerTuning,
    timer: Timer,
    /// Objects still to drop in the current wave (0 = between waves)
    remaining_in_wave: u32,
    waves_started: u32,
}

impl Spawner {
    pub fn new(tuning: SpawnerTuning) -> Self {
        Self {
            tuning,
            timer: Timer::new(),
            remaining_in_wave: 0,
            waves_started: 0,
        }
    }

    /// Fresh schedule with the first wave due immediately
    pub fn start(&mut self, now_ms: u64) {
        self.timer = Timer::new();
        self.remaining_in_wave = 0;
        self.waves_started = 0;
        self.timer.arm(now_ms, 0);
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.remaining_in_wave = 0;
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn waves_started(&self) -> u32 {
        self.waves_started
    }

    /// Emit every object due by `now_ms`
    pub fn poll(
        &mut self,
        now_ms: u64,
        difficulty: &DifficultyState,
        field: &FieldTuning,
        rng: &mut impl Rng,
        next_id: &mut u32,
    ) -> Vec<FallingObject> {
        let mut spawned = Vec::new();

        while let Some(due_ms) = self.timer.fire(now_ms) {
            if self.remaining_in_wave == 0 {
                self.remaining_in_wave = difficulty.wave_size.max(1);
                self.waves_started += 1;
                log::debug!(
                    "Wave {}: {} objects at speed {:.2}",
                    self.waves_started,
                    self.remaining_in_wave,
                    difficulty.fall_speed
                );
            }

            spawned.push(create_object(*next_id, difficulty, field, rng));
            *next_id += 1;
            self.remaining_in_wave -= 1;

            let delay_ms = if self.remaining_in_wave > 0 {
                self.tuning.intra_wave_delay_ms
            } else {
                difficulty.wave_interval_ms
            };
            if !self.timer.arm_at(due_ms.saturating_add(delay_ms)) {
                break;
            }
        }

        spawned
    }
}
