//! Snake Arcade - a terminal game arcade hosting Snake
//!
//! This library provides:
//! - Core game logic, the phase machine and the tick timer (game module)
//! - Keyboard and swipe translation into game commands (input module)
//! - The game catalog and the host that mounts one game at a time (loader module)
//! - The key relay from the host into a game's embedded frame (relay module)
//! - High-score persistence (persistence module)
//! - TUI rendering and the session clock (render, metrics modules)
//! - Runnable modes: the full arcade, or Snake on its own (modes module)

pub mod game;
pub mod input;
pub mod loader;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod relay;
pub mod render;
