//! Swipe gestures to game commands
//!
//! Only the translation from a finished gesture (start and end points) is
//! handled here; collecting the points is the front end's business.

use crate::game::{Command, Direction, GamePhase};

/// Shortest movement along the dominant axis that counts as a swipe
pub const MIN_SWIPE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default)]
pub struct SwipeTranslator {
    start: Option<TouchPoint>,
}

impl SwipeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, point: TouchPoint) {
        self.start = Some(point);
    }

    /// Finish a gesture. A touch on the menu starts the game and one on the
    /// game-over screen restarts it; otherwise a long enough swipe turns the
    /// snake along its dominant axis.
    pub fn touch_end(&mut self, point: TouchPoint, phase: GamePhase) -> Option<Command> {
        let start = self.start.take();

        match phase {
            GamePhase::Menu => return Some(Command::Start),
            GamePhase::GameOver => return Some(Command::Restart),
            GamePhase::Playing | GamePhase::Paused => {}
        }

        let start = start?;
        let dx = point.x - start.x;
        let dy = point.y - start.y;

        let direction = if dx.abs() > dy.abs() {
            if dx.abs() <= MIN_SWIPE {
                return None;
            }
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else {
            if dy.abs() <= MIN_SWIPE {
                return None;
            }
            if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            }
        };

        Some(Command::Move(direction))
    }
}
