use super::{
    action::{Command, Direction},
    config::{ConfigError, GameConfig},
    engine::{GameEngine, StepResult},
    state::{CollisionType, GamePhase, GameState},
    timer::TickTimer,
};
use crate::persistence::{HighScoreStore, KeyValueStore};
use std::mem;
use std::time::Duration;
use tracing::{debug, info};

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    Collision(CollisionType),
    /// The snake filled every cell, leaving nowhere to put food
    BoardFilled,
}

/// Notifications for the UI collaborator (overlay, HUD, buttons)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh game began (from the menu, or a restart)
    GameStarted,
    PhaseChanged { from: GamePhase, to: GamePhase },
    ScoreChanged(u32),
    SpeedChanged(Duration),
    NewHighScore(u32),
    GameOver {
        score: u32,
        high_score: u32,
        cause: GameOverCause,
    },
}

/// One Snake game instance: phase machine, board, speed, timer, high score.
///
/// Everything lives in the instance, so any number of games can run side by
/// side without sharing state.
pub struct SnakeGame {
    engine: GameEngine,
    state: GameState,
    phase: GamePhase,
    /// Direction to commit at the start of the next tick
    pending_direction: Direction,
    /// Set once a turn has been accepted in the current tick window
    turn_locked: bool,
    tick_interval: Duration,
    high_score: u32,
    high_scores: HighScoreStore,
    timer: TickTimer,
    events: Vec<GameEvent>,
}

impl SnakeGame {
    /// Build a game in the Menu phase. Fails if `config` does not validate.
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        Self::with_engine(GameEngine::new(config), store)
    }

    pub fn with_engine(
        mut engine: GameEngine,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self, ConfigError> {
        engine.config().validate()?;
        let config = engine.config().clone();
        let high_scores = HighScoreStore::new(store, config.high_score_key.clone());
        let high_score = high_scores.load();
        let state = engine.reset();

        debug!(high_score, tiles = config.tile_count(), "snake game constructed");

        Ok(Self {
            engine,
            pending_direction: state.snake.direction,
            state,
            phase: GamePhase::Menu,
            turn_locked: false,
            tick_interval: config.initial_tick(),
            high_score,
            high_scores,
            timer: TickTimer::new(),
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Resolves when the next simulation tick is due. Pending forever while
    /// no game is running.
    pub async fn next_tick(&mut self) {
        self.timer.tick().await;
    }

    /// Apply a command. Returns false when the command does not apply to the
    /// current phase (or is a rejected turn) and was ignored.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match (command, self.phase) {
            (Command::Move(direction), GamePhase::Playing) => self.steer(direction),
            (Command::Start, GamePhase::Menu) => {
                self.begin_game();
                true
            }
            (Command::TogglePause, GamePhase::Playing) => {
                self.timer.cancel();
                self.set_phase(GamePhase::Paused);
                true
            }
            (Command::TogglePause, GamePhase::Paused) => {
                self.timer.start(self.tick_interval);
                self.set_phase(GamePhase::Playing);
                true
            }
            (Command::Restart, GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver) => {
                self.timer.cancel();
                self.begin_game();
                true
            }
            _ => {
                debug!(?command, phase = ?self.phase, "command ignored");
                false
            }
        }
    }

    /// Run one simulation step. Does nothing unless a game is running.
    pub fn tick(&mut self) -> Option<StepResult> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        self.state.snake.direction = self.pending_direction;
        self.turn_locked = false;

        let result = self.engine.step(&mut self.state);
        match result {
            StepResult::Moved { ate_food: true } => {
                self.events.push(GameEvent::ScoreChanged(self.state.score));
                if let Some(next) = self
                    .engine
                    .next_interval(self.state.score, self.tick_interval)
                {
                    self.tick_interval = next;
                    self.timer.start(next);
                    debug!(interval_ms = next.as_millis() as u64, "speed up");
                    self.events.push(GameEvent::SpeedChanged(next));
                }
            }
            StepResult::Moved { ate_food: false } => {}
            StepResult::Collided(collision) => self.end_game(GameOverCause::Collision(collision)),
            StepResult::BoardFilled => {
                self.events.push(GameEvent::ScoreChanged(self.state.score));
                self.end_game(GameOverCause::BoardFilled);
            }
        }

        Some(result)
    }

    /// Host teardown hook: stop the tick schedule. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if self.timer.cancel() {
            debug!(phase = ?self.phase, "tick timer cancelled by cleanup");
        }
    }

    fn steer(&mut self, direction: Direction) -> bool {
        if direction == self.pending_direction {
            return true;
        }
        if self.turn_locked || direction.is_opposite(self.state.snake.direction) {
            return false;
        }

        self.pending_direction = direction;
        self.turn_locked = true;
        true
    }

    fn begin_game(&mut self) {
        self.state = self.engine.reset();
        self.pending_direction = self.state.snake.direction;
        self.turn_locked = false;
        self.tick_interval = self.engine.config().initial_tick();
        self.timer.start(self.tick_interval);

        self.events.push(GameEvent::GameStarted);
        self.events.push(GameEvent::ScoreChanged(0));
        self.set_phase(GamePhase::Playing);
    }

    fn end_game(&mut self, cause: GameOverCause) {
        self.timer.cancel();
        self.set_phase(GamePhase::GameOver);

        let score = self.state.score;
        if score > self.high_score {
            self.high_score = score;
            self.high_scores.save(score);
            self.events.push(GameEvent::NewHighScore(score));
        }

        info!(score, high_score = self.high_score, ?cause, "game over");
        self.events.push(GameEvent::GameOver {
            score,
            high_score: self.high_score,
            cause,
        });
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = mem::replace(&mut self.phase, to);
        if from != to {
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }
}
