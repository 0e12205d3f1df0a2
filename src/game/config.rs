use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Reasons a [`GameConfig`] cannot be used to build an engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Cell size of zero would make the grid infinite
    #[error("cell size must be greater than zero")]
    ZeroCellSize,

    /// The canvas must hold a whole number of cells on each axis
    #[error("canvas size {canvas_size} is not a multiple of cell size {cell_size}")]
    UnevenGrid { canvas_size: u32, cell_size: u32 },

    /// The starting snake (plus one free cell ahead of it) must fit in a row
    #[error("grid of {tile_count} tiles cannot hold a snake of length {snake_length}")]
    GridTooSmall { tile_count: u32, snake_length: usize },

    /// Grids beyond [`MAX_TILES`] cannot be drawn or indexed safely
    #[error("grid of {tile_count} tiles exceeds the maximum of {max}")]
    GridTooLarge { tile_count: u32, max: u32 },

    #[error("initial snake length must be at least 1")]
    EmptySnake,

    /// The speed floor must not exceed the starting interval
    #[error("minimum tick interval {min_ms}ms exceeds initial interval {initial_ms}ms")]
    FloorAboveInitial { min_ms: u64, initial_ms: u64 },

    #[error("points per speed-up must be at least 1")]
    ZeroSpeedupStep,
}

/// Largest supported number of cells along one side of the grid
pub const MAX_TILES: u32 = 255;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square drawing surface, in surface units
    pub canvas_size: u32,
    /// Side length of one grid cell, in surface units
    pub cell_size: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Tick interval at the start of every game
    pub initial_tick_ms: u64,
    /// The tick interval never drops below this
    pub min_tick_ms: u64,
    /// Amount shaved off the interval at each speed-up
    pub tick_decrement_ms: u64,
    /// A speed-up happens every time the score reaches a multiple of this
    pub points_per_speedup: u32,

    /// Storage key holding the persisted high score
    pub high_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_size: 480,
            cell_size: 24,
            initial_snake_length: 3,
            initial_tick_ms: 120,
            min_tick_ms: 60,
            tick_decrement_ms: 5,
            points_per_speedup: 5,
            high_score_key: "snakeHighScore".to_string(),
        }
    }
}

impl GameConfig {
    /// Create a configuration whose grid is `tiles` cells on each side
    pub fn with_tiles(tiles: u32) -> Self {
        let defaults = Self::default();
        Self {
            canvas_size: tiles * defaults.cell_size,
            ..defaults
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::with_tiles(10)
    }

    /// Number of cells along each side of the grid
    pub fn tile_count(&self) -> u32 {
        if self.cell_size == 0 {
            return 0;
        }
        self.canvas_size / self.cell_size
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    pub fn tick_decrement(&self) -> Duration {
        Duration::from_millis(self.tick_decrement_ms)
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.canvas_size % self.cell_size != 0 {
            return Err(ConfigError::UnevenGrid {
                canvas_size: self.canvas_size,
                cell_size: self.cell_size,
            });
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        // The snake starts centered and heading right, so its tail reaches
        // back `length - 1` cells from the middle column.
        let tile_count = self.tile_count();
        let center = (tile_count / 2) as usize;
        if center + 1 < self.initial_snake_length || tile_count < 2 {
            return Err(ConfigError::GridTooSmall {
                tile_count,
                snake_length: self.initial_snake_length,
            });
        }

        if tile_count > MAX_TILES {
            return Err(ConfigError::GridTooLarge {
                tile_count,
                max: MAX_TILES,
            });
        }

        if self.min_tick_ms > self.initial_tick_ms {
            return Err(ConfigError::FloorAboveInitial {
                min_ms: self.min_tick_ms,
                initial_ms: self.initial_tick_ms,
            });
        }
        if self.points_per_speedup == 0 {
            return Err(ConfigError::ZeroSpeedupStep);
        }
        Ok(())
    }
}
