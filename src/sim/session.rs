//! Game session: owns every piece of run state and the schedules that
//! mutate it.
//!
//! All work happens inside [`GameSession::step`], one fixed 20 ms step at a
//! time. Inside a step the order is fixed: session clock, weather check,
//! spawner, ambient effects, then the consolidated object pass.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{StepOutcome, resolve_step};
use super::difficulty::{DifficultyController, DifficultyState};
use super::environment::EnvironmentCycle;
use super::spawner::Spawner;
use super::state::{FallingObject, GameEvent, Hud, Paddle, SessionState, SessionStatus};
use super::timer::{Clock, Interval};
use crate::consts::{SIM_DT, STEP_MS};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Session clock period (one elapsed second)
const SECOND_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct GameSession {
    tuning: Tuning,
    status: SessionStatus,
    state: SessionState,
    difficulty: DifficultyController,
    spawner: Spawner,
    environment: EnvironmentCycle,
    /// Live objects, dense; removed with `swap_remove`
    objects: Vec<FallingObject>,
    paddle: Paddle,
    clock: Clock,
    session_clock: Interval,
    environment_check: Interval,
    seed: u64,
    rng: Pcg32,
    next_id: u32,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(tuning: Tuning, settings: &Settings, seed: u64) -> Self {
        let tuning = tuning.sanitize();
        let environment = EnvironmentCycle::new(
            tuning.environment.clone(),
            &tuning.field,
            settings.max_particles(),
        );
        let environment_check = Interval::new(environment.check_period_ms());

        Self {
            status: SessionStatus::NotStarted,
            state: SessionState::default(),
            difficulty: DifficultyController::new(tuning.difficulty.clone()),
            spawner: Spawner::new(tuning.spawner.clone()),
            environment,
            objects: Vec::new(),
            paddle: Paddle::centered(&tuning.field),
            clock: Clock::new(),
            session_clock: Interval::new(SECOND_MS),
            environment_check,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            events: Vec::new(),
            tuning,
        }
    }

    // --- accessors ---

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::Over
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn difficulty(&self) -> &DifficultyState {
        self.difficulty.state()
    }

    pub fn environment(&self) -> &EnvironmentCycle {
        &self.environment
    }

    pub fn objects(&self) -> &[FallingObject] {
        &self.objects
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True while any schedule could still fire
    pub fn has_pending_schedules(&self) -> bool {
        self.session_clock.is_active()
            || self.environment_check.is_active()
            || self.spawner.is_active()
            || self
                .environment
                .effect()
                .is_some_and(|e| e.lightning_armed())
    }

    pub fn hud(&self) -> Hud {
        Hud {
            status: self.status,
            score: self.state.score,
            level: self.difficulty.level(),
            missed: self.state.miss_count,
            max_misses: self.tuning.session.max_misses,
            elapsed_secs: self.state.elapsed_secs,
            phase: self.environment.current(),
            live_objects: self.objects.len(),
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Update the paddle from the input collaborator
    pub fn set_paddle(&mut self, center: f32, width: f32) {
        self.paddle = Paddle::clamped(center, width, self.tuning.field.width);
    }

    /// Add an object directly (bypassing the spawner)
    pub fn insert_object(&mut self, mut object: FallingObject) -> u32 {
        object.id = self.next_id;
        self.next_id += 1;
        let id = object.id;
        self.objects.push(object);
        id
    }

    // --- lifecycle ---

    fn cancel_schedules(&mut self) {
        self.session_clock.cancel();
        self.environment_check.cancel();
        self.spawner.cancel();
    }

    fn emit_hud(&mut self) {
        self.events.push(GameEvent::ScoreChanged(self.state.score));
        self.events.push(GameEvent::LevelChanged(self.difficulty.level()));
        self.events.push(GameEvent::MissesChanged {
            missed: self.state.miss_count,
            max: self.tuning.session.max_misses,
        });
        self.events.push(GameEvent::TimeChanged(self.state.elapsed_secs));
    }

    /// Clean slate: initial state, no objects, no effects, no schedules
    pub fn reset(&mut self) {
        self.cancel_schedules();
        self.status = SessionStatus::NotStarted;
        self.state = SessionState::default();
        self.difficulty.reset();
        self.objects.clear();
        self.environment.reset();
        self.paddle = Paddle::centered(&self.tuning.field);
        self.clock = Clock::new();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.next_id = 1;
        self.emit_hud();
    }

    /// Reset with a different seed
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Arm the session clock, spawner and weather check.
    ///
    /// Prior schedules are replaced, never stacked. Refused once over.
    pub fn start(&mut self) {
        if self.is_over() {
            log::warn!("start() ignored: session is over, reset first");
            return;
        }
        self.cancel_schedules();

        let now = self.clock.now_ms();
        self.session_clock = Interval::new(SECOND_MS);
        self.session_clock.start(now);
        self.environment_check = Interval::new(self.environment.check_period_ms());
        self.environment_check.start(now);
        self.spawner.start(now);
        self.environment.start(now, &mut self.rng);

        self.status = SessionStatus::Running;
        self.events.push(GameEvent::PhaseChanged(self.environment.current()));
        log::info!("Session started (seed {})", self.seed);
    }

    /// `reset()` then `start()`
    pub fn start_or_restart(&mut self) {
        self.reset();
        self.start();
    }

    pub fn register_catch(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state.score += self.tuning.session.points_per_catch;
        self.state.catch_count += 1;
        self.events.push(GameEvent::ScoreChanged(self.state.score));

        if self.difficulty.on_catch(self.state.catch_count) > 0 {
            self.events.push(GameEvent::LevelChanged(self.difficulty.level()));
        }
    }

    pub fn register_miss(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state.miss_count += 1;
        let max = self.tuning.session.max_misses;
        self.events.push(GameEvent::MissesChanged {
            missed: self.state.miss_count,
            max,
        });
        if self.state.miss_count >= max {
            self.end();
        }
    }

    /// Terminal transition; a second call does nothing
    pub fn end(&mut self) {
        if self.is_over() {
            return;
        }
        self.status = SessionStatus::Over;
        self.cancel_schedules();
        self.objects.clear();
        self.environment.clear();

        let final_score = self.state.score;
        self.events.push(GameEvent::GameOver { final_score });
        log::info!(
            "Game over: {} caught, {} missed, {}s, level {}",
            final_score,
            self.state.miss_count,
            self.state.elapsed_secs,
            self.difficulty.level()
        );
    }

    // --- simulation ---

    /// Advance one fixed step
    pub fn step(&mut self) {
        if !self.is_running() {
            return;
        }
        let now = self.clock.advance(STEP_MS);

        for _ in 0..self.session_clock.poll(now) {
            self.state.elapsed_secs += 1;
            self.events.push(GameEvent::TimeChanged(self.state.elapsed_secs));
            self.difficulty.on_time_elapsed(self.state.elapsed_secs);
        }

        if self.environment_check.poll(now) > 0 {
            let elapsed = self.state.elapsed_secs;
            if let Some(phase) = self.environment.evaluate(elapsed, now, &mut self.rng) {
                self.events.push(GameEvent::PhaseChanged(phase));
            }
        }

        let spawned = self.spawner.poll(
            now,
            self.difficulty.state(),
            &self.tuning.field,
            &mut self.rng,
            &mut self.next_id,
        );
        for object in spawned {
            self.events.push(GameEvent::ObjectSpawned {
                id: object.id,
                kind: object.kind,
                x: object.x,
            });
            self.objects.push(object);
        }

        self.environment.update(now, SIM_DT, &mut self.rng);

        self.advance_objects();
    }

    /// Move every live object, then settle catches before misses
    fn advance_objects(&mut self) {
        let paddle = self.paddle.bounds(&self.tuning.field);
        let mut caught = 0;
        let mut missed = 0;

        let mut i = 0;
        while i < self.objects.len() {
            let object = &mut self.objects[i];
            let prev = object.advance();
            match resolve_step(object, prev, &paddle, &self.tuning.field) {
                StepOutcome::Falling => i += 1,
                StepOutcome::Caught => {
                    let object = self.objects.swap_remove(i);
                    self.events.push(GameEvent::ObjectCaught { id: object.id });
                    caught += 1;
                }
                StepOutcome::Missed => {
                    let object = self.objects.swap_remove(i);
                    self.events.push(GameEvent::ObjectMissed { id: object.id });
                    missed += 1;
                }
            }
        }

        for _ in 0..caught {
            self.register_catch();
        }
        for _ in 0..missed {
            self.register_miss();
        }
    }
}
