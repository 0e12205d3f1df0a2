use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use super::terminal::{Tui, restore_terminal, setup_terminal};
use crate::game::{GameConfig, SnakeGame};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::KeyValueStore;
use crate::render::Renderer;

/// Snake on its own, reading the keyboard directly with no host or relay
pub struct SnakeMode {
    game: SnakeGame,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl SnakeMode {
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>) -> Result<Self> {
        let game = SnakeGame::new(config, store).context("Invalid game configuration")?;
        Ok(Self {
            game,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.game.cleanup();
        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame), independent of the tick rate
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = self.game.next_tick() => {
                    self.game.tick();
                }

                _ = render_timer.tick() => {
                    for event in self.game.drain_events() {
                        self.metrics.observe(&event);
                    }
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, "Snake", &self.game, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            games_played = self.metrics.games_played,
            high_score = self.game.high_score(),
            "leaving snake"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Game(input) => {
                if let Some(command) = self.input_handler.command_for(&input, self.game.phase()) {
                    self.game.handle_command(command);
                }
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;
    use crate::persistence::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = SnakeMode::new(GameConfig::default(), Box::new(MemoryStore::new())).unwrap();
        assert_eq!(mode.game.phase(), GamePhase::Menu);
        assert_eq!(mode.game.score(), 0);
    }

    #[test]
    fn test_keys_drive_game() {
        let mut mode = SnakeMode::new(GameConfig::default(), Box::new(MemoryStore::new())).unwrap();

        mode.handle_event(press(KeyCode::Char(' ')));
        assert_eq!(mode.game.phase(), GamePhase::Playing);

        mode.handle_event(press(KeyCode::Up));
        assert_eq!(mode.game.pending_direction(), crate::game::Direction::Up);

        mode.handle_event(press(KeyCode::Char(' ')));
        assert_eq!(mode.game.phase(), GamePhase::Paused);

        mode.handle_event(press(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
