use std::time::{Duration, Instant};

use crate::game::{GameEvent, GamePhase};

/// Session clock and counters shown in the HUD.
///
/// The clock only runs while a game is being played; time spent paused or
/// on the menu is not counted.
pub struct GameMetrics {
    running_since: Option<Instant>,
    banked: Duration,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub best_this_session: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            games_played: 0,
            best_this_session: 0,
        }
    }

    /// Refresh `elapsed_time`; called once per rendered frame
    pub fn update(&mut self) {
        self.elapsed_time = self.banked
            + self
                .running_since
                .map(|since| since.elapsed())
                .unwrap_or_default();
    }

    /// Follow the game's events
    pub fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted => self.on_game_start(),
            GameEvent::PhaseChanged { to: GamePhase::Playing, .. } => self.resume_clock(),
            GameEvent::PhaseChanged {
                from: GamePhase::Playing,
                ..
            } => self.stop_clock(),
            GameEvent::GameOver { score, .. } => self.on_game_over(*score),
            _ => {}
        }
    }

    pub fn on_game_start(&mut self) {
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.stop_clock();
        self.games_played += 1;
        self.best_this_session = self.best_this_session.max(final_score);
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    fn resume_clock(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn stop_clock(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.banked += since.elapsed();
        }
        self.update();
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, GameOverCause};

    fn phase(from: GamePhase, to: GamePhase) -> GameEvent {
        GameEvent::PhaseChanged { from, to }
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_clock_follows_phases() {
        let mut metrics = GameMetrics::new();
        assert!(!metrics.is_running());

        metrics.observe(&GameEvent::GameStarted);
        metrics.observe(&phase(GamePhase::Menu, GamePhase::Playing));
        assert!(metrics.is_running());

        metrics.observe(&phase(GamePhase::Playing, GamePhase::Paused));
        assert!(!metrics.is_running());
        let paused_at = metrics.elapsed_time;
        std::thread::sleep(Duration::from_millis(30));
        metrics.update();
        assert_eq!(metrics.elapsed_time, paused_at);

        metrics.observe(&phase(GamePhase::Paused, GamePhase::Playing));
        assert!(metrics.is_running());
    }

    #[test]
    fn test_game_over_counts_games() {
        let mut metrics = GameMetrics::new();
        let over = |score| GameEvent::GameOver {
            score,
            high_score: score,
            cause: GameOverCause::Collision(CollisionType::Wall),
        };

        metrics.observe(&GameEvent::GameStarted);
        metrics.observe(&over(10));
        assert!(!metrics.is_running());
        metrics.observe(&GameEvent::GameStarted);
        metrics.observe(&over(4));

        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.best_this_session, 10);
    }

    #[test]
    fn test_restart_resets_clock() {
        let mut metrics = GameMetrics::new();
        metrics.observe(&GameEvent::GameStarted);
        std::thread::sleep(Duration::from_millis(30));
        metrics.update();
        assert!(metrics.elapsed_time >= Duration::from_millis(30));

        // Restarting a running game produces no phase change, only a start.
        metrics.observe(&GameEvent::GameStarted);
        metrics.update();
        assert!(metrics.elapsed_time < Duration::from_millis(30));
    }
}
