use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snake::Position;

/// Side length of the default square play area, in display units.
pub const DEFAULT_AREA_UNITS: u16 = 600;

/// Side length of one grid cell, in display units.
pub const DEFAULT_CELL_UNITS: u16 = 20;

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = DEFAULT_AREA_UNITS / DEFAULT_CELL_UNITS;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = DEFAULT_AREA_UNITS / DEFAULT_CELL_UNITS;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Milliseconds removed from the interval per speed step.
pub const SPEED_STEP_MS: u64 = 5;

/// Score needed per speed step.
pub const POINTS_PER_SPEED_STEP: u32 = 50;

/// Score granted per food eaten.
pub const FOOD_REWARD: u32 = 10;

/// Smallest playable grid: one cell for the snake, one for food.
pub const MIN_GRID_CELLS: usize = 2;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns true when `position` lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < i32::from(self.width)
            && position.y < i32::from(self.height)
    }

    /// Canonical spawn cell for a fresh snake.
    ///
    /// Lands on `(10, 10)` for the default 30x30 grid and stays inside any
    /// non-empty grid.
    #[must_use]
    pub fn start_position(self) -> Position {
        Position {
            x: i32::from(self.width / 3),
            y: i32::from(self.height / 3),
        }
    }
}

/// Rejected session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small: need room for a snake and food")]
    DegenerateGrid { width: u16, height: u16 },
    #[error("tick interval must be greater than zero")]
    ZeroInterval,
    #[error("minimum tick interval {min_ms}ms exceeds the initial interval {initial_ms}ms")]
    IntervalFloorAboveStart { min_ms: u64, initial_ms: u64 },
    #[error("speed threshold must be greater than zero when speed progression is enabled")]
    ZeroSpeedThreshold,
    #[error("invalid layout: {0}")]
    InvalidLayout(&'static str),
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options recognized at session construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub initial_tick_interval_ms: u64,
    pub food_reward: u32,
    pub min_tick_interval_ms: u64,
    pub speed_step_ms: u64,
    pub speed_threshold: u32,
    /// Enables the score-driven speed-up of the advanced variant.
    pub speed_progression: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            initial_tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            food_reward: FOOD_REWARD,
            min_tick_interval_ms: MIN_TICK_INTERVAL_MS,
            speed_step_ms: SPEED_STEP_MS,
            speed_threshold: POINTS_PER_SPEED_STEP,
            speed_progression: false,
        }
    }
}

impl GameConfig {
    /// Default configuration on a custom grid.
    #[must_use]
    pub fn with_grid(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Default configuration with speed progression switched on.
    #[must_use]
    pub fn advanced() -> Self {
        Self {
            speed_progression: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize {
            width: self.width,
            height: self.height,
        }
    }

    #[must_use]
    pub fn initial_tick_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_interval_ms)
    }

    /// Checks every constraint a session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = self.grid();
        if grid.width == 0 || grid.height == 0 || grid.total_cells() < MIN_GRID_CELLS {
            return Err(ConfigError::DegenerateGrid {
                width: grid.width,
                height: grid.height,
            });
        }

        if self.initial_tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        // The floor and threshold only drive the stepped speed-up.
        if !self.speed_progression {
            return Ok(());
        }

        if self.min_tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.min_tick_interval_ms > self.initial_tick_interval_ms {
            return Err(ConfigError::IntervalFloorAboveStart {
                min_ms: self.min_tick_interval_ms,
                initial_ms: self.initial_tick_interval_ms,
            });
        }

        if self.speed_threshold == 0 {
            return Err(ConfigError::ZeroSpeedThreshold);
        }

        Ok(())
    }

    /// Parses a JSON document; absent keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads a JSON config file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
