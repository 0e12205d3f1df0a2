//! Keyboard and touch translation into game commands

pub mod handler;
pub mod touch;

pub use handler::{InputHandler, KeyAction, KeyInput};
pub use touch::{SwipeTranslator, TouchPoint};
