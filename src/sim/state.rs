//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::environment::EnvironmentPhase;
use crate::clamp_span;
use crate::consts::STEPS_PER_SECOND;
use crate::tuning::FieldTuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Fresh or reset, no schedules running
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended; terminal until reset
    Over,
}

/// Fruit categories (the renderer maps these to sprites)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FruitKind {
    Apple,
    Banana,
    Grapes,
    Pear,
    Papaya,
    Watermelon,
    Melon,
}

impl FruitKind {
    pub const ALL: [FruitKind; 7] = [
        FruitKind::Apple,
        FruitKind::Banana,
        FruitKind::Grapes,
        FruitKind::Pear,
        FruitKind::Papaya,
        FruitKind::Watermelon,
        FruitKind::Melon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FruitKind::Apple => "apple",
            FruitKind::Banana => "banana",
            FruitKind::Grapes => "grapes",
            FruitKind::Pear => "pear",
            FruitKind::Papaya => "papaya",
            FruitKind::Watermelon => "watermelon",
            FruitKind::Melon => "melon",
        }
    }
}

/// A falling fruit
///
/// `progress` is the distance fallen since spawn and doubles as the y
/// coordinate of the object's bottom edge, so a fresh object sits entirely
/// above the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub kind: FruitKind,
    /// Left edge (pixels)
    pub x: f32,
    pub progress: f32,
    /// Pixels per simulation step, fixed at spawn
    pub speed: f32,
}

impl FallingObject {
    pub fn new(id: u32, kind: FruitKind, x: f32, speed: f32) -> Self {
        Self {
            id,
            kind,
            x,
            progress: 0.0,
            speed,
        }
    }

    /// Bounding box at the given progress
    pub fn bounds_at(&self, progress: f32, size: f32) -> Rect {
        Rect::new(
            Vec2::new(self.x, progress - size),
            Vec2::new(self.x + size, progress),
        )
    }

    pub fn bounds(&self, size: f32) -> Rect {
        self.bounds_at(self.progress, size)
    }

    /// Move down one step; returns the progress before the move
    pub fn advance(&mut self) -> f32 {
        let prev = self.progress;
        self.progress += self.speed;
        prev
    }

    /// Seconds from spawn until the object reaches the floor
    pub fn fall_duration_secs(&self, field_height: f32) -> f32 {
        field_height / (self.speed * STEPS_PER_SECOND)
    }
}

/// The player's basket, fed by the input collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Paddle {
    /// Horizontal center (pixels)
    pub center: f32,
    pub width: f32,
}

impl Paddle {
    /// Centered paddle for a field
    pub fn centered(field: &FieldTuning) -> Self {
        Self {
            center: field.width / 2.0,
            width: field.paddle_width,
        }
    }

    /// Paddle at `center`, clamped so it stays fully inside the field
    pub fn clamped(center: f32, width: f32, field_width: f32) -> Self {
        let width = width.clamp(0.0, field_width);
        let left = clamp_span(center - width / 2.0, width, field_width);
        Self {
            center: left + width / 2.0,
            width,
        }
    }

    pub fn left(&self) -> f32 {
        self.center - self.width / 2.0
    }

    /// Bounding box, resting `paddle_bottom_margin` above the floor
    pub fn bounds(&self, field: &FieldTuning) -> Rect {
        let bottom = field.height - field.paddle_bottom_margin;
        Rect::new(
            Vec2::new(self.left(), bottom - field.paddle_height),
            Vec2::new(self.left() + self.width, bottom),
        )
    }
}

/// Score, misses and session clock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub catch_count: u32,
    pub miss_count: u32,
    /// Whole seconds since start; never rewound by the weather cycle
    pub elapsed_secs: u32,
}

/// Display-facing notifications, drained by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    LevelChanged(u32),
    MissesChanged { missed: u32, max: u32 },
    TimeChanged(u32),
    PhaseChanged(EnvironmentPhase),
    ObjectSpawned { id: u32, kind: FruitKind, x: f32 },
    ObjectCaught { id: u32 },
    ObjectMissed { id: u32 },
    GameOver { final_score: u64 },
}

/// Everything the HUD shows, in one serializable snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub status: SessionStatus,
    pub score: u64,
    pub level: u32,
    pub missed: u32,
    pub max_misses: u32,
    pub elapsed_secs: u32,
    pub phase: EnvironmentPhase,
    pub live_objects: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_duration() {
        let object = FallingObject::new(1, FruitKind::Apple, 0.0, 1.5);
        assert!((object.fall_duration_secs(600.0) - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_object_spawns_above_field() {
        let object = FallingObject::new(1, FruitKind::Pear, 100.0, 2.0);
        let rect = object.bounds(50.0);
        assert_eq!(rect.max.y, 0.0);
        assert_eq!(rect.min.y, -50.0);
        assert_eq!(rect.min.x, 100.0);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut object = FallingObject::new(1, FruitKind::Melon, 0.0, 2.5);
        let prev = object.advance();
        assert_eq!(prev, 0.0);
        assert_eq!(object.progress, 2.5);
    }

    #[test]
    fn test_paddle_clamped_to_field() {
        let paddle = Paddle::clamped(-50.0, 120.0, 800.0);
        assert_eq!(paddle.left(), 0.0);
        let paddle = Paddle::clamped(1000.0, 120.0, 800.0);
        assert_eq!(paddle.left() + paddle.width, 800.0);
        // Wider than the field: shrinks to fit
        let paddle = Paddle::clamped(10.0, 2000.0, 800.0);
        assert_eq!(paddle.width, 800.0);
        assert_eq!(paddle.left(), 0.0);
    }

    #[test]
    fn test_paddle_bounds() {
        let field = FieldTuning::default();
        let paddle = Paddle::centered(&field);
        let rect = paddle.bounds(&field);
        assert_eq!(rect.max.y, field.height - field.paddle_bottom_margin);
        assert_eq!(rect.max.y - rect.min.y, field.paddle_height);
        assert_eq!(rect.max.x - rect.min.x, field.paddle_width);
    }

    #[test]
    fn test_fruit_names() {
        assert_eq!(FruitKind::ALL.len(), 7);
        assert_eq!(FruitKind::Watermelon.as_str(), "watermelon");
    }
}
