//! Collision detection between falling objects and the paddle
//!
//! Plain axis-aligned boxes in field space (y grows downward). The per-step
//! test uses the box swept between the previous and current position, so an
//! object moving more than the paddle's height in one step still connects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::FallingObject;
use crate::tuning::FieldTuning;

/// Axis-aligned box; `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    /// Smallest box covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(self.min.min(other.min), self.max.max(other.max))
    }
}

/// Edge-inclusive overlap test (touching counts as a catch)
pub fn check_collision(object: &Rect, paddle: &Rect) -> bool {
    object.bottom() >= paddle.top()
        && object.top() <= paddle.bottom()
        && object.right() >= paddle.left()
        && object.left() <= paddle.right()
}

/// What happened to an object during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Falling,
    Caught,
    Missed,
}

/// Resolve an object that just moved from `prev_progress` to its current
/// progress. The paddle is tested first, so a step that both reaches the
/// paddle and crosses the floor counts as a catch.
pub fn resolve_step(
    object: &FallingObject,
    prev_progress: f32,
    paddle: &Rect,
    field: &FieldTuning,
) -> StepOutcome {
    let swept = object
        .bounds_at(prev_progress, field.object_size)
        .union(&object.bounds(field.object_size));

    if check_collision(&swept, paddle) {
        StepOutcome::Caught
    } else if object.progress >= field.height {
        StepOutcome::Missed
    } else {
        StepOutcome::Falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FruitKind, Paddle};

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        Rect::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn test_overlap() {
        let paddle = rect(100.0, 500.0, 220.0, 540.0);
        assert!(check_collision(&rect(120.0, 460.0, 170.0, 510.0), &paddle));
        // Touching edges count
        assert!(check_collision(&rect(50.0, 450.0, 100.0, 500.0), &paddle));
        // Beside
        assert!(!check_collision(&rect(230.0, 480.0, 280.0, 530.0), &paddle));
        // Above
        assert!(!check_collision(&rect(120.0, 400.0, 170.0, 450.0), &paddle));
        // Below
        assert!(!check_collision(&rect(120.0, 541.0, 170.0, 591.0), &paddle));
    }

    #[test]
    fn test_union() {
        let merged = rect(0.0, 0.0, 10.0, 10.0).union(&rect(5.0, 20.0, 15.0, 30.0));
        assert_eq!(merged, rect(0.0, 0.0, 15.0, 30.0));
    }

    #[test]
    fn test_fast_object_does_not_tunnel() {
        let field = FieldTuning::default();
        let paddle = rect(340.0, 300.0, 460.0, 340.0);

        // 200 px per step jumps clean over the 40 px paddle
        let mut object = FallingObject::new(1, FruitKind::Apple, 375.0, 200.0);
        object.progress = 250.0;
        let prev = object.advance();
        assert!(!check_collision(&object.bounds_at(prev, field.object_size), &paddle));
        assert!(!check_collision(&object.bounds(field.object_size), &paddle));
        assert_eq!(resolve_step(&object, prev, &paddle, &field), StepOutcome::Caught);
    }

    #[test]
    fn test_catch_beats_floor() {
        let field = FieldTuning::default();
        let paddle = Paddle::clamped(400.0, 120.0, field.width).bounds(&field);

        let mut object = FallingObject::new(1, FruitKind::Banana, 375.0, 100.0);
        object.progress = 560.0;
        let prev = object.advance();
        assert!(object.progress >= field.height);
        assert_eq!(resolve_step(&object, prev, &paddle, &field), StepOutcome::Caught);
    }

    #[test]
    fn test_miss_at_floor() {
        let field = FieldTuning::default();
        let paddle = Paddle::clamped(100.0, 120.0, field.width).bounds(&field);

        let mut object = FallingObject::new(1, FruitKind::Grapes, 600.0, 2.0);
        object.progress = 599.0;
        let prev = object.advance();
        assert_eq!(resolve_step(&object, prev, &paddle, &field), StepOutcome::Missed);
    }

    #[test]
    fn test_still_falling() {
        let field = FieldTuning::default();
        let paddle = Paddle::clamped(100.0, 120.0, field.width).bounds(&field);

        let mut object = FallingObject::new(1, FruitKind::Pear, 600.0, 2.0);
        let prev = object.advance();
        assert_eq!(resolve_step(&object, prev, &paddle, &field), StepOutcome::Falling);
    }
}
