//! Fixed timestep simulation tick
//!
//! Turns per-frame input into session calls and runs whole 20 ms steps.

use super::session::GameSession;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Paddle center from the pointer/keyboard layer
    pub paddle_center: Option<f32>,
    /// Start / restart button
    pub start_or_restart: bool,
    /// Idle/demo mode - AI moves the paddle
    pub idle_mode: bool,
}

/// Where the autopilot wants the paddle: under the object closest to the floor
fn autopilot_target(session: &GameSession) -> Option<f32> {
    let half = session.tuning().field.object_size / 2.0;
    session
        .objects()
        .iter()
        .max_by(|a, b| {
            a.progress
                .partial_cmp(&b.progress)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|o| o.x + half)
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput) {
    if input.start_or_restart {
        session.start_or_restart();
    }

    let width = session.paddle().width;
    if input.idle_mode {
        if let Some(target) = autopilot_target(session) {
            let current = session.paddle().center;
            let max_delta = PADDLE_MAX_SPEED * SIM_DT;
            let next = current + (target - current).clamp(-max_delta, max_delta);
            session.set_paddle(next, width);
        }
    } else if let Some(center) = input.paddle_center {
        session.set_paddle(center, width);
    }

    session.step();
}

/// Accumulates real frame time into fixed steps
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator: f32,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every whole step that fits in `frame_dt` (seconds).
    /// Returns the number of steps taken.
    pub fn frame(&mut self, session: &mut GameSession, input: &TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);

        let mut input = input.clone();
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            tick(session, &input);
            // Lifecycle presses apply once per frame
            input.start_or_restart = false;
            self.accumulator -= SIM_DT;
            steps += 1;
        }

        if steps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of frame backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }
}
