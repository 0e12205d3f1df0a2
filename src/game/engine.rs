use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;

/// Result of a single simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The snake moved one cell
    Moved {
        /// Whether the snake ate food this step (and grew)
        ate_food: bool,
    },
    /// The new head was illegal; the snake was left untouched
    Collided(CollisionType),
    /// The snake ate the last food and now covers every cell
    BoardFilled,
}

impl StepResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepResult::Moved { .. })
    }
}

/// Simulation rules: movement, collisions, food and speed.
///
/// The engine has no notion of phases or timers; the state machine in
/// [`super::machine`] decides when a step happens.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine with a fixed food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh board: snake centered, heading right, food placed
    pub fn reset(&mut self) -> GameState {
        let tile_count = self.config.tile_count();
        let center = (tile_count / 2) as i32;

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );

        // A validated config always leaves free cells around a new snake.
        let food = self
            .spawn_food(&snake, tile_count)
            .unwrap_or(Position::new(0, 0));

        GameState::new(snake, food, tile_count)
    }

    /// Advance the snake one cell in its committed direction
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(collision) = self.check_collision(state, new_head) {
            return StepResult::Collided(collision);
        }

        let ate_food = new_head == state.food;
        state.snake.advance(new_head, ate_food);
        state.steps += 1;

        if ate_food {
            state.score += 1;
            match self.spawn_food(&state.snake, state.tile_count) {
                Some(food) => state.food = food,
                None => return StepResult::BoardFilled,
            }
        }

        StepResult::Moved { ate_food }
    }

    /// Tick interval to switch to after reaching `score`, if it changes
    pub fn next_interval(&self, score: u32, current: Duration) -> Option<Duration> {
        if score == 0 || score % self.config.points_per_speedup != 0 {
            return None;
        }

        let floor = self.config.min_tick();
        let next = current
            .saturating_sub(self.config.tick_decrement())
            .max(floor);

        (next != current).then_some(next)
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random free cell by rejection sampling.
    ///
    /// Returns `None` only when the snake covers the whole grid.
    fn spawn_food(&mut self, snake: &Snake, tile_count: u32) -> Option<Position> {
        let cells = (tile_count as usize) * (tile_count as usize);
        if snake.len() >= cells {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..tile_count) as i32;
            let y = self.rng.gen_range(0..tile_count) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}
