use thiserror::Error;
use tracing::{debug, info};

use super::catalog::{GameCatalog, GameMetadata};
use crate::input::KeyInput;
use crate::relay::{EmbeddedFrame, FrameInbox, FramePolicy, InputRelay, RelayReport, embedded_frame};

pub const HOME_TITLE: &str = "GG - Gustave's Games";

/// Teardown hook every hosted game exposes. The host calls it right before
/// removing the game's frame; the game must stop its timers and detach its
/// listeners.
pub trait HostedGame {
    fn game_cleanup(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("game {0:?} not found")]
    UnknownGame(String),
}

/// The arcade page: a game catalog, at most one mounted game frame, and the
/// relay that forwards the page's key presses into that frame.
#[derive(Debug)]
pub struct ArcadeHost {
    catalog: GameCatalog,
    relay: InputRelay<EmbeddedFrame>,
    current: Option<String>,
    title: String,
}

impl ArcadeHost {
    pub fn new(catalog: GameCatalog) -> Self {
        Self {
            catalog,
            relay: InputRelay::new(),
            current: None,
            title: HOME_TITLE.to_string(),
        }
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn current_game(&self) -> Option<&GameMetadata> {
        self.current.as_deref().and_then(|id| self.catalog.get(id))
    }

    pub fn is_game_active(&self) -> bool {
        self.current.is_some()
    }

    /// Mount `game_id` in a fresh frame and start relaying keys into it.
    ///
    /// The previous game, if any, must already have been unmounted with
    /// [`ArcadeHost::cleanup_current_game`]; its frame is dropped here.
    /// Returns the game's end of the new frame.
    pub fn play_game(&mut self, game_id: &str, policy: FramePolicy) -> Result<FrameInbox, HostError> {
        let game = self
            .catalog
            .get(game_id)
            .ok_or_else(|| HostError::UnknownGame(game_id.to_string()))?;

        self.title = format!("GG - {}", game.name);
        info!(name = %game.name, entry = %game.entry_path(), "playing game");

        let (frame, inbox) = embedded_frame(policy);
        self.relay.attach(frame);
        self.current = Some(game_id.to_string());
        Ok(inbox)
    }

    /// Forward a key pressed on the host page into the mounted game
    pub fn forward_key(&mut self, input: &KeyInput) -> RelayReport {
        self.relay.forward(input)
    }

    /// Run the game's cleanup hook, stop relaying and drop its frame
    pub fn cleanup_current_game(&mut self, game: Option<&mut dyn HostedGame>) {
        if self.current.is_none() && !self.relay.is_attached() {
            return;
        }

        if let Some(game) = game {
            game.game_cleanup();
        }
        self.relay.detach();
        if let Some(id) = self.current.take() {
            debug!(game = %id, "game unmounted");
        }
    }

    /// Unmount whatever is playing and go back to the catalog
    pub fn show_home(&mut self, game: Option<&mut dyn HostedGame>) {
        self.cleanup_current_game(game);
        self.title = HOME_TITLE.to_string();
    }
}
