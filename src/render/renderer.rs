use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::game::{GamePhase, Position, SnakeGame};
use crate::loader::MenuEntry;
use crate::metrics::GameMetrics;

/// Draws whatever the game currently holds. Safe to call every frame in
/// every phase; it never mutates the game.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, title: &str, game: &SnakeGame, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(game, metrics);
        frame.render_widget(stats, chunks[0]);

        let tiles = u16::try_from(game.state().tile_count).unwrap_or(u16::MAX);
        let board = center(
            chunks[1],
            tiles.saturating_mul(2).saturating_add(2),
            tiles.saturating_add(2),
        );
        frame.render_widget(self.render_grid(title, game), board);

        if let Some(overlay) = self.render_overlay(game) {
            let area = center(board, board.width.min(34), 7);
            frame.render_widget(Clear, area);
            frame.render_widget(overlay, area);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    /// Home screen of the arcade: the game menu
    pub fn render_catalog(
        &self,
        frame: &mut Frame,
        title: &str,
        entries: &[MenuEntry],
        selected: usize,
    ) {
        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| {
                let style = if entry.is_selectable() {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(Span::styled(entry.label.clone(), style)))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(format!(" {title} ")),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default().with_selected(Some(selected));
        let rows = u16::try_from(entries.len()).unwrap_or(u16::MAX);
        let area = center(frame.area(), 44, rows.saturating_add(2));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_grid(&self, title: &str, game: &SnakeGame) -> Paragraph<'_> {
        let state = game.state();
        let show_board = game.phase().shows_board();
        let mut lines = Vec::with_capacity(state.tile_count as usize);

        for y in 0..state.tile_count as i32 {
            let mut spans = Vec::with_capacity(state.tile_count as usize);

            for x in 0..state.tile_count as i32 {
                let pos = Position::new(x, y);

                let cell = if !show_board {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                } else if pos == state.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "● ",
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {title} ")),
        )
    }

    fn render_stats(&self, game: &SnakeGame, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(game.score().to_string(), value),
            Span::raw("    "),
            Span::styled("High: ", label),
            Span::styled(game.high_score().to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", game.tick_interval().as_millis()), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    /// Menu, pause and game-over screens sit on top of the board
    fn render_overlay(&self, game: &SnakeGame) -> Option<Paragraph<'_>> {
        let (heading, message, color) = match game.phase() {
            GamePhase::Menu => ("🐍 SNAKE", "Press SPACE to start!".to_string(), Color::Green),
            GamePhase::Paused => ("⏸ PAUSED", "Press SPACE to continue".to_string(), Color::Yellow),
            GamePhase::GameOver => (
                "💀 GAME OVER",
                format!("Final Score: {}", game.score()),
                Color::Red,
            ),
            GamePhase::Playing => return None,
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                heading,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        ];

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("SPACE", Style::default().fg(Color::Cyan)),
            Span::raw(" start/pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rect centered in `area`, clipped to it
fn center(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Command, GameConfig};
    use crate::loader::{GameCatalog, GameMetadata};
    use crate::persistence::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_in_every_phase() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        let mut game = SnakeGame::new(GameConfig::default(), Box::new(MemoryStore::new())).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, "GG - Snake", &game, &metrics))
            .unwrap();
        assert!(screen_text(&terminal).contains("SNAKE"));

        game.handle_command(Command::Start);
        terminal
            .draw(|frame| renderer.render(frame, "GG - Snake", &game, &metrics))
            .unwrap();
        assert!(screen_text(&terminal).contains("■"));

        game.handle_command(Command::TogglePause);
        terminal
            .draw(|frame| renderer.render(frame, "GG - Snake", &game, &metrics))
            .unwrap();
        assert!(screen_text(&terminal).contains("PAUSED"));

        game.handle_command(Command::TogglePause);
        while game.tick().is_some() {}
        terminal
            .draw(|frame| renderer.render(frame, "GG - Snake", &game, &metrics))
            .unwrap();
        assert!(screen_text(&terminal).contains("GAME OVER"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        let renderer = Renderer::new();
        let game = SnakeGame::new(GameConfig::default(), Box::new(MemoryStore::new())).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, "GG", &game, &GameMetrics::new()))
            .unwrap();
    }

    #[test]
    fn test_largest_grid_fits_small_terminal() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut game = SnakeGame::new(
            GameConfig::with_tiles(crate::game::MAX_TILES),
            Box::new(MemoryStore::new()),
        )
        .unwrap();
        game.handle_command(Command::Start);

        terminal
            .draw(|frame| Renderer::new().render(frame, "GG", &game, &GameMetrics::new()))
            .unwrap();
        assert!(screen_text(&terminal).contains("Score"));
    }

    #[test]
    fn test_catalog_lists_games() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let catalog = GameCatalog::from_metadata([GameMetadata::new(
            "Snake",
            Some("🐍"),
            "snake",
            "index.html",
        )]);

        terminal
            .draw(|frame| {
                Renderer::new().render_catalog(frame, "Arcade", &catalog.menu_entries(), 1)
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Snake"));
        assert!(text.contains("Coming"));
    }
}
