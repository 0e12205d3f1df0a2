//! Core game logic module for Snake
//!
//! The engine holds the movement and collision rules, the machine wraps it
//! with phases, the tick timer and high-score bookkeeping. Nothing here
//! touches the terminal.

pub mod action;
pub mod config;
pub mod engine;
pub mod machine;
pub mod state;
pub mod timer;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{ConfigError, GameConfig, MAX_TILES};
pub use engine::{GameEngine, StepResult};
pub use machine::{GameEvent, GameOverCause, SnakeGame};
pub use state::{CollisionType, GamePhase, GameState, Position, Snake};
pub use timer::TickTimer;
