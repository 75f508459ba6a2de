use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded for each food eaten
    pub food_points: u32,

    // Speed scaling
    /// Tick interval at the start of a round, in milliseconds
    pub base_tick_ms: u64,
    /// Number of length increments between speed-ups
    pub speed_step_length: usize,
    /// Fraction of the interval removed at each speed-up
    pub speed_step_fraction: f64,
    /// Shortest tick interval the game will ever reach, in milliseconds
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 3,
            food_points: 10,
            base_tick_ms: 100,
            speed_step_length: 2,
            speed_step_fraction: 0.05,
            min_tick_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Tick interval for a snake of the given length.
    ///
    /// Every `speed_step_length` cells of growth shave `speed_step_fraction`
    /// off the interval, floored at `min_tick_ms`. The result never grows as
    /// the snake gets longer.
    pub fn tick_interval_for_length(&self, length: usize) -> Duration {
        let growth = length.saturating_sub(self.initial_snake_length);
        let steps = (growth / self.speed_step_length.max(1)) as i32;

        let base = self.base_tick_ms as f64;
        let scaled = base * (1.0 - self.speed_step_fraction).powi(steps);
        let floored = scaled.max(self.min_tick_ms as f64);

        Duration::from_nanos((floored * 1_000_000.0).round() as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::invalid("game.grid", "dimensions must be non-zero"));
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::invalid(
                "game.initial_snake_length",
                "snake needs at least one cell",
            ));
        }
        // The starting snake is laid out horizontally from the centre leftwards
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(ConfigError::invalid(
                "game.initial_snake_length",
                "snake does not fit on the grid",
            ));
        }
        if self.base_tick_ms == 0 || self.min_tick_ms == 0 {
            return Err(ConfigError::invalid("game.tick", "intervals must be non-zero"));
        }
        if self.min_tick_ms > self.base_tick_ms {
            return Err(ConfigError::invalid(
                "game.min_tick_ms",
                "must not exceed base_tick_ms",
            ));
        }
        if self.speed_step_length == 0 {
            return Err(ConfigError::invalid("game.speed_step_length", "must be non-zero"));
        }
        if !(0.0..1.0).contains(&self.speed_step_fraction) {
            return Err(ConfigError::invalid(
                "game.speed_step_fraction",
                "must be in [0, 1)",
            ));
        }
        Ok(())
    }
}
