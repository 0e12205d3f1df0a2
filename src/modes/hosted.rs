//! The Snake game as it lives inside an embedded frame: the game instance
//! plus the listeners it installs (the frame inbox and its key mapping).

use std::future;

use crate::game::{Command, GameEvent, SnakeGame};
use crate::input::{InputHandler, KeyInput};
use crate::loader::HostedGame;
use crate::relay::FrameInbox;

/// Why [`HostedSnake::next_wake`] returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameWake {
    Key(KeyInput),
    Tick,
    /// The host side of the frame is gone; no more keys will come
    Detached,
}

pub struct HostedSnake {
    game: SnakeGame,
    inbox: Option<FrameInbox>,
    input_handler: InputHandler,
}

impl HostedSnake {
    pub fn new(game: SnakeGame, inbox: FrameInbox) -> Self {
        Self {
            game,
            inbox: Some(inbox),
            input_handler: InputHandler::new(),
        }
    }

    pub fn game(&self) -> &SnakeGame {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut SnakeGame {
        &mut self.game
    }

    /// Whether the frame listeners are still installed
    pub fn is_listening(&self) -> bool {
        self.inbox.is_some()
    }

    /// The game's key handler, also reachable by the host as a direct call
    pub fn handle_key_press(&mut self, key: &KeyInput) -> bool {
        match self.input_handler.command_for(key, self.game.phase()) {
            Some(command) => self.game.handle_command(command),
            None => false,
        }
    }

    pub fn handle_command(&mut self, command: Command) -> bool {
        self.game.handle_command(command)
    }

    /// Wait until a key press arrives in the frame or a tick is due.
    ///
    /// Both sources live in this one future so the caller can poll it next
    /// to its own `select!` branches while holding a single borrow.
    pub async fn next_wake(&mut self) -> FrameWake {
        let Self { game, inbox, .. } = self;
        let key = async {
            match inbox.as_mut() {
                Some(inbox) => inbox.recv().await,
                None => future::pending().await,
            }
        };

        let wake = tokio::select! {
            key = key => match key {
                Some(key) => FrameWake::Key(key),
                None => FrameWake::Detached,
            },
            _ = game.next_tick() => FrameWake::Tick,
        };

        if wake == FrameWake::Detached {
            self.inbox = None;
        }
        wake
    }

    /// React to a wake-up from [`HostedSnake::next_wake`]
    pub fn handle_wake(&mut self, wake: FrameWake) {
        match wake {
            FrameWake::Key(key) => {
                self.handle_key_press(&key);
            }
            FrameWake::Tick => {
                self.game.tick();
            }
            FrameWake::Detached => {}
        }
    }

    /// Handle every key press already queued in the frame
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(key) = self.inbox.as_mut().and_then(FrameInbox::try_next) {
            self.handle_key_press(&key);
            handled += 1;
        }
        handled
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.game.drain_events()
    }
}

impl HostedGame for HostedSnake {
    fn game_cleanup(&mut self) {
        self.game.cleanup();
        if let Some(mut inbox) = self.inbox.take() {
            inbox.detach();
        }
    }
}
