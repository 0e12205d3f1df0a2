use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::game::{Command, Direction, GamePhase};

/// A key press in the form both sides of the frame boundary understand:
/// a key identifier ("ArrowUp", " ", "w") plus a physical code
/// ("ArrowUp", "Space", "KeyW").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: String,
    pub code: String,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
        }
    }

    /// Keys the host swallows instead of letting them scroll or activate the page
    pub fn is_game_key(&self) -> bool {
        matches!(
            self.key.as_str(),
            " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Enter"
        )
    }
}

/// What the host does with a terminal key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Deliver to the game (directly or through the relay)
    Game(KeyInput),
    /// Leave the current game (back to the catalog, or exit)
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Up => KeyAction::Game(KeyInput::new("ArrowUp", "ArrowUp")),
            KeyCode::Down => KeyAction::Game(KeyInput::new("ArrowDown", "ArrowDown")),
            KeyCode::Left => KeyAction::Game(KeyInput::new("ArrowLeft", "ArrowLeft")),
            KeyCode::Right => KeyAction::Game(KeyInput::new("ArrowRight", "ArrowRight")),
            KeyCode::Enter => KeyAction::Game(KeyInput::new("Enter", "Enter")),
            KeyCode::Char(' ') => KeyAction::Game(KeyInput::new(" ", "Space")),
            KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
                let code = if c.is_ascii_digit() {
                    format!("Digit{c}")
                } else {
                    format!("Key{}", c.to_ascii_uppercase())
                };
                KeyAction::Game(KeyInput::new(c.to_string(), code))
            }
            _ => KeyAction::None,
        }
    }

    /// Translate a key into a game command given the phase the game is in.
    ///
    /// Space and Enter are context sensitive: start from the menu, restart
    /// after a game over, pause or resume otherwise. R only restarts a game
    /// that is over or paused.
    pub fn command_for(&self, input: &KeyInput, phase: GamePhase) -> Option<Command> {
        match input.key.as_str() {
            " " | "Space" | "Enter" => Some(match phase {
                GamePhase::Menu => Command::Start,
                GamePhase::GameOver => Command::Restart,
                GamePhase::Playing | GamePhase::Paused => Command::TogglePause,
            }),
            "r" | "R" => matches!(phase, GamePhase::GameOver | GamePhase::Paused)
                .then_some(Command::Restart),
            "ArrowUp" | "w" | "W" => Some(Command::Move(Direction::Up)),
            "ArrowDown" | "s" | "S" => Some(Command::Move(Direction::Down)),
            "ArrowLeft" | "a" | "A" => Some(Command::Move(Direction::Left)),
            "ArrowRight" | "d" | "D" => Some(Command::Move(Direction::Right)),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
