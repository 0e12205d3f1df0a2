//! The arcade host: a game menu, and the selected game mounted in an
//! embedded frame that receives the host's key presses through the relay.

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use super::hosted::HostedSnake;
use super::terminal::{Tui, restore_terminal, setup_terminal};
use crate::game::{GameConfig, SnakeGame};
use crate::input::{InputHandler, KeyAction};
use crate::loader::{ArcadeHost, GameCatalog, GameMetadata, HostedGame, MenuTarget};
use crate::metrics::GameMetrics;
use crate::persistence::JsonFileStore;
use crate::relay::FramePolicy;
use crate::render::Renderer;

/// Games this build knows how to host
pub fn default_catalog() -> GameCatalog {
    GameCatalog::from_metadata([GameMetadata::new(
        "Snake",
        Some("🐍"),
        "snake",
        "index.html",
    )])
}

pub struct ArcadeMode {
    host: ArcadeHost,
    config: GameConfig,
    data_dir: PathBuf,
    policy: FramePolicy,
    session: Option<HostedSnake>,
    selected: usize,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl ArcadeMode {
    pub fn new(
        catalog: GameCatalog,
        config: GameConfig,
        data_dir: PathBuf,
        policy: FramePolicy,
    ) -> Self {
        Self {
            host: ArcadeHost::new(catalog),
            config,
            data_dir,
            policy,
            session: None,
            // Entry 0 is Home; start on the first game.
            selected: 1,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_loop(&mut terminal).await;

        self.show_home();
        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            let session = self.session.as_mut();
            let frame_wake = async {
                match session {
                    Some(session) => session.next_wake().await,
                    None => future::pending().await,
                }
            };

            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                wake = frame_wake => {
                    if let Some(session) = self.session.as_mut() {
                        session.handle_wake(wake);
                    }
                }

                _ = render_timer.tick() => {
                    self.draw(terminal)?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Tui) -> Result<()> {
        if let Some(session) = self.session.as_mut() {
            for event in session.drain_events() {
                self.metrics.observe(&event);
            }
        }
        self.metrics.update();

        let entries = self.host.catalog().menu_entries();
        terminal
            .draw(|frame| match &self.session {
                Some(session) => {
                    self.renderer
                        .render(frame, self.host.title(), session.game(), &self.metrics)
                }
                None => self
                    .renderer
                    .render_catalog(frame, self.host.title(), &entries, self.selected),
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.session.is_some() {
            self.handle_game_key(key);
        } else {
            self.handle_menu_key(key);
        }
    }

    /// While a game is mounted every key goes through the relay; only the
    /// quit keys are kept by the host, and they return to the menu.
    fn handle_game_key(&mut self, key: KeyEvent) {
        match self.input_handler.handle_key_event(key) {
            KeyAction::Game(input) => {
                self.host.forward_key(&input);
            }
            KeyAction::Quit => self.show_home(),
            KeyAction::None => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let entries = self.host.catalog().menu_entries();
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.selected = (self.selected + 1).min(entries.len().saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(MenuTarget::Game(id)) = entries.get(self.selected).map(|e| &e.target) {
                    self.play_game(id);
                }
            }
            _ => {
                if self.input_handler.handle_key_event(key) == KeyAction::Quit {
                    self.should_quit = true;
                }
            }
        }
    }

    fn play_game(&mut self, game_id: &str) {
        self.show_home();

        let inbox = match self.host.play_game(game_id, self.policy) {
            Ok(inbox) => inbox,
            Err(err) => {
                warn!(error = %err, "cannot play game");
                return;
            }
        };

        if game_id != "snake" {
            warn!(game = game_id, "no engine for game");
            self.host.show_home(None);
            return;
        }

        let store = JsonFileStore::new(&self.data_dir, game_id);
        let game = match SnakeGame::new(self.config.clone(), Box::new(store)) {
            Ok(game) => game,
            Err(err) => {
                warn!(error = %err, "cannot build game");
                self.host.show_home(None);
                return;
            }
        };
        self.session = Some(HostedSnake::new(game, inbox));
        self.metrics = GameMetrics::new();
    }

    /// Unmount the current game (running its cleanup hook) and show the menu
    fn show_home(&mut self) {
        let mut session = self.session.take();
        self.host
            .show_home(session.as_mut().map(|s| s as &mut dyn HostedGame));

        if session.is_some() {
            info!(games_played = self.metrics.games_played, "back to arcade menu");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;
    use crate::loader::HOME_TITLE;
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn arcade(dir: &TempDir) -> ArcadeMode {
        ArcadeMode::new(
            default_catalog(),
            GameConfig::default(),
            dir.path().to_path_buf(),
            FramePolicy::default(),
        )
    }

    #[test]
    fn test_menu_selects_and_mounts_snake() {
        let dir = TempDir::new().unwrap();
        let mut mode = arcade(&dir);

        mode.handle_event(key(KeyCode::Enter));
        assert!(mode.session.is_some());
        assert_eq!(mode.host.title(), "GG - Snake");
    }

    #[test]
    fn test_keys_are_relayed_into_frame() {
        let dir = TempDir::new().unwrap();
        let mut mode = arcade(&dir);
        mode.handle_event(key(KeyCode::Enter));

        mode.handle_event(key(KeyCode::Char(' ')));
        let session = mode.session.as_mut().unwrap();
        assert_eq!(session.game().phase(), GamePhase::Menu);

        session.pump();
        assert_eq!(session.game().phase(), GamePhase::Playing);
    }

    #[test]
    fn test_cross_origin_frame_still_gets_keys() {
        let dir = TempDir::new().unwrap();
        let mut mode = ArcadeMode::new(
            default_catalog(),
            GameConfig::default(),
            dir.path().to_path_buf(),
            FramePolicy::cross_origin(),
        );
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Char(' ')));

        let session = mode.session.as_mut().unwrap();
        assert_eq!(session.pump(), 1);
        assert_eq!(session.game().phase(), GamePhase::Playing);
    }

    #[test]
    fn test_quit_returns_home_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let mut mode = arcade(&dir);
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Char(' ')));
        mode.session.as_mut().unwrap().pump();

        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.session.is_none());
        assert!(!mode.should_quit);
        assert_eq!(mode.host.title(), HOME_TITLE);
        assert!(!mode.host.is_game_active());

        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_coming_soon_not_selectable() {
        let dir = TempDir::new().unwrap();
        let mut mode = arcade(&dir);

        mode.handle_event(key(KeyCode::Down));
        mode.handle_event(key(KeyCode::Down));
        assert_eq!(mode.selected, 2);
        mode.handle_event(key(KeyCode::Enter));
        assert!(mode.session.is_none());
    }
}
