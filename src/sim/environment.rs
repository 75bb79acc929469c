//! Weather and time-of-day cycle
//!
//! The cycle is an ordered list of phases with fixed dwell times. The phase
//! is derived from session time modulo the cycle length, so the session
//! clock itself is never rewound. Rain, snow and storm phases own an
//! ambient particle effect that lives exactly as long as the phase.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timer::Timer;
use crate::tuning::{EnvironmentTuning, FieldTuning};

/// Weather / time-of-day phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentPhase {
    Day,
    Afternoon,
    Night,
    Rain,
    Windy,
    Snow,
    Storm,
}

impl EnvironmentPhase {
    pub const ALL: [EnvironmentPhase; 7] = [
        EnvironmentPhase::Day,
        EnvironmentPhase::Afternoon,
        EnvironmentPhase::Night,
        EnvironmentPhase::Rain,
        EnvironmentPhase::Windy,
        EnvironmentPhase::Snow,
        EnvironmentPhase::Storm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentPhase::Day => "day",
            EnvironmentPhase::Afternoon => "afternoon",
            EnvironmentPhase::Night => "night",
            EnvironmentPhase::Rain => "rain",
            EnvironmentPhase::Windy => "windy",
            EnvironmentPhase::Snow => "snow",
            EnvironmentPhase::Storm => "storm",
        }
    }

    /// Ambient effect that accompanies this phase
    pub fn ambient(&self) -> Option<AmbientKind> {
        match self {
            EnvironmentPhase::Rain => Some(AmbientKind::Rain),
            EnvironmentPhase::Snow => Some(AmbientKind::Snow),
            EnvironmentPhase::Storm => Some(AmbientKind::Storm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbientKind {
    Rain,
    Snow,
    /// Rain plus lightning
    Storm,
}

/// Cosmetic particle (rain drop or snowflake)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Downward speed (pixels/s)
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
}

/// Brief lightning flash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub pos: Vec2,
    pub expires_ms: u64,
}

/// Live particle system for the current phase
#[derive(Debug, Clone)]
pub struct AmbientEffect {
    pub kind: AmbientKind,
    pub particles: Vec<Particle>,
    pub flashes: Vec<Flash>,
    lightning: Timer,
    strikes: u32,
}

fn rain_drop(width: f32, height: f32, rng: &mut impl Rng) -> Particle {
    Particle {
        pos: Vec2::new(rng.random::<f32>() * width, -rng.random::<f32>() * height),
        speed: rng.random_range(600.0..900.0),
        size: 2.0,
        opacity: rng.random_range(0.4..0.8),
    }
}

fn snow_flake(width: f32, height: f32, rng: &mut impl Rng) -> Particle {
    Particle {
        pos: Vec2::new(rng.random::<f32>() * width, -rng.random::<f32>() * height),
        speed: rng.random_range(30.0..80.0),
        size: rng.random_range(2.0..6.0),
        opacity: rng.random_range(0.6..1.0),
    }
}

/// Gap until the next strike; tolerates an inverted range
fn lightning_delay(tuning: &EnvironmentTuning, rng: &mut impl Rng) -> u64 {
    let min = tuning.lightning_min_ms.max(1);
    rng.random_range(min..=tuning.lightning_max_ms.max(min))
}

impl AmbientEffect {
    fn spawn(
        kind: AmbientKind,
        now_ms: u64,
        tuning: &EnvironmentTuning,
        field: Vec2,
        budget: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let particles: Vec<Particle> = match kind {
            AmbientKind::Rain | AmbientKind::Storm => (0..tuning.rain_drops.min(budget))
                .map(|_| rain_drop(field.x, field.y, rng))
                .collect(),
            AmbientKind::Snow => (0..tuning.snow_flakes.min(budget))
                .map(|_| snow_flake(field.x, field.y, rng))
                .collect(),
        };

        let mut lightning = Timer::new();
        if kind == AmbientKind::Storm && budget > 0 {
            lightning.arm(now_ms, lightning_delay(tuning, rng));
        }

        Self {
            kind,
            particles,
            flashes: Vec::new(),
            lightning,
            strikes: 0,
        }
    }

    fn update(
        &mut self,
        now_ms: u64,
        dt: f32,
        tuning: &EnvironmentTuning,
        field: Vec2,
        rng: &mut impl Rng,
    ) {
        for particle in &mut self.particles {
            particle.pos.y += particle.speed * dt;
            if particle.pos.y > field.y {
                particle.pos.y -= field.y + particle.size;
                particle.pos.x = rng.random::<f32>() * field.x;
            }
        }

        while let Some(due_ms) = self.lightning.fire(now_ms) {
            self.strikes += 1;
            self.flashes.push(Flash {
                pos: Vec2::new(
                    rng.random::<f32>() * field.x,
                    rng.random::<f32>() * field.y / 3.0,
                ),
                expires_ms: due_ms.saturating_add(tuning.flash_ms),
            });
            let next_ms = due_ms.saturating_add(lightning_delay(tuning, rng));
            if next_ms == due_ms || !self.lightning.arm_at(next_ms) {
                break;
            }
        }
        self.flashes.retain(|f| f.expires_ms > now_ms);
    }

    /// Cancel lightning and drop every particle
    fn clear(&mut self) {
        self.lightning.cancel();
        self.particles.clear();
        self.flashes.clear();
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn lightning_armed(&self) -> bool {
        self.lightning.is_armed()
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentCycle {
    tuning: EnvironmentTuning,
    field: Vec2,
    particle_budget: usize,
    current: EnvironmentPhase,
    /// Position inside the cycle at the last evaluation
    phase_secs: u32,
    effect: Option<AmbientEffect>,
}

impl EnvironmentCycle {
    pub fn new(tuning: EnvironmentTuning, field: &FieldTuning, particle_budget: usize) -> Self {
        let current = Self::initial_phase(&tuning);
        Self {
            tuning,
            field: Vec2::new(field.width, field.height),
            particle_budget,
            current,
            phase_secs: 0,
            effect: None,
        }
    }

    fn initial_phase(tuning: &EnvironmentTuning) -> EnvironmentPhase {
        tuning
            .phases
            .first()
            .map(|p| p.phase)
            .unwrap_or(EnvironmentPhase::Day)
    }

    pub fn current(&self) -> EnvironmentPhase {
        self.current
    }

    pub fn phase_secs(&self) -> u32 {
        self.phase_secs
    }

    pub fn cycle_secs(&self) -> u32 {
        self.tuning.cycle_secs()
    }

    pub fn check_period_ms(&self) -> u64 {
        self.tuning.check_period_secs as u64 * 1000
    }

    pub fn effect(&self) -> Option<&AmbientEffect> {
        self.effect.as_ref()
    }

    pub fn has_ambient(&self) -> bool {
        self.effect.is_some()
    }

    /// Phase and in-cycle position for a session time
    pub fn phase_at(&self, elapsed_secs: u32) -> (EnvironmentPhase, u32) {
        let cycle = self.cycle_secs();
        if cycle == 0 {
            return (self.current, 0);
        }
        let position = elapsed_secs % cycle;
        let mut start = 0;
        for dwell in &self.tuning.phases {
            if position < start + dwell.dwell_secs {
                return (dwell.phase, position);
            }
            start += dwell.dwell_secs;
        }
        (self.current, position)
    }

    /// Bring up the initial phase's effect, if it has one
    pub fn start(&mut self, now_ms: u64, rng: &mut impl Rng) {
        if self.effect.is_none() {
            self.enter(self.current, now_ms, rng);
        }
    }

    /// Re-derive the phase; returns the new phase on a transition
    pub fn evaluate(
        &mut self,
        elapsed_secs: u32,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Option<EnvironmentPhase> {
        let (phase, position) = self.phase_at(elapsed_secs);
        self.phase_secs = position;
        if phase == self.current {
            return None;
        }

        log::info!(
            "Weather: {} -> {} at {}s",
            self.current.as_str(),
            phase.as_str(),
            elapsed_secs
        );
        self.clear();
        self.current = phase;
        self.enter(phase, now_ms, rng);
        Some(phase)
    }

    fn enter(&mut self, phase: EnvironmentPhase, now_ms: u64, rng: &mut impl Rng) {
        if self.particle_budget == 0 {
            return;
        }
        if let Some(kind) = phase.ambient() {
            self.effect = Some(AmbientEffect::spawn(
                kind,
                now_ms,
                &self.tuning,
                self.field,
                self.particle_budget,
                rng,
            ));
        }
    }

    /// Animate particles and run the lightning schedule
    pub fn update(&mut self, now_ms: u64, dt: f32, rng: &mut impl Rng) {
        if let Some(effect) = &mut self.effect {
            effect.update(now_ms, dt, &self.tuning, self.field, rng);
        }
    }

    /// Tear down the ambient effect
    pub fn clear(&mut self) {
        if let Some(mut effect) = self.effect.take() {
            effect.clear();
        }
    }

    /// Back to the first phase with nothing running
    pub fn reset(&mut self) {
        self.clear();
        self.current = Self::initial_phase(&self.tuning);
        self.phase_secs = 0;
    }
}
