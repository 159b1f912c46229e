//! Round configuration.
//!
//! All values are fixed when a `TurnController` is built; there is no runtime
//! reconfiguration.

use crate::grid::GridTopology;
use crate::hex::HexCoordinate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Smallest grid whose center is not a boundary cell
const MIN_DIMENSION: u32 = 3;

/// Largest grid side accepted
const MAX_DIMENSION: u32 = 256;

/// What to do when random obstacles happen to enclose the spawn cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnclosurePolicy {
    /// Regenerate the obstacles until an escape route exists
    #[default]
    Reroll,
    /// Keep the board; the token is captured on the first move
    Accept,
}

/// Errors from `GameConfig::validate`
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Grid must be at least 3x3, got {width}x{height}")]
    GridTooSmall { width: u32, height: u32 },

    #[error("Grid must be at most 256x256, got {width}x{height}")]
    GridTooLarge { width: u32, height: u32 },

    #[error("Obstacle density must be in [0, 1), got {0}")]
    InvalidDensity(f64),

    #[error("Safe cell {0} is outside the grid")]
    SafeCellOutOfBounds(HexCoordinate),

    #[error("Max generation attempts must be at least 1")]
    NoGenerationAttempts,

    #[error("Board is {board_width}x{board_height} but the config describes {width}x{height}")]
    BoardTopologyMismatch {
        board_width: u32,
        board_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Board has a placement waiting to be resolved")]
    BoardMidTurn,
}

/// Constructor-time constants for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Fraction of cells blocked at round start
    pub obstacle_density: f64,
    /// How long input stays closed after the token moves
    pub hold_duration_ms: u64,
    /// Cells that never receive a starting obstacle
    pub safe_cells: Vec<HexCoordinate>,
    /// Handling of a board that spawns already enclosed
    pub enclosure_policy: EnclosurePolicy,
    /// Upper bound on rerolls under `EnclosurePolicy::Reroll`
    pub max_generation_attempts: u32,
    /// Fixed RNG seed for reproducible boards
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn topology(&self) -> GridTopology {
        GridTopology::new(self.width, self.height)
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    /// Number of starting obstacles: ⌊density × cell count⌋
    pub fn obstacle_count(&self) -> usize {
        (self.obstacle_density * self.topology().cell_count() as f64).floor() as usize
    }

    /// Check that the configuration describes a playable round
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }

        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }

        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(ConfigError::InvalidDensity(self.obstacle_density));
        }

        let topology = self.topology();
        if let Some(cell) = self.safe_cells.iter().find(|c| !topology.is_in_bounds(c)) {
            return Err(ConfigError::SafeCellOutOfBounds(*cell));
        }

        if self.max_generation_attempts == 0 {
            return Err(ConfigError::NoGenerationAttempts);
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 11,
            height: 11,
            obstacle_density: 0.15,
            hold_duration_ms: 600,
            safe_cells: Vec::new(),
            enclosure_policy: EnclosurePolicy::default(),
            max_generation_attempts: 64,
            seed: None,
        }
    }
}
