//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Single-threaded; every schedule is a handle owned by the session
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod environment;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Rect, StepOutcome, check_collision, resolve_step};
pub use difficulty::{DifficultyController, DifficultyState};
pub use environment::{AmbientEffect, AmbientKind, EnvironmentCycle, EnvironmentPhase};
pub use session::GameSession;
pub use spawner::{Spawner, create_object};
pub use state::{
    FallingObject, FruitKind, GameEvent, Hud, Paddle, SessionState, SessionStatus,
};
pub use tick::{FrameDriver, TickInput, tick};
pub use timer::{Clock, Interval, Timer, TimerState};
