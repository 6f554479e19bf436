//! Game rules fixed at construction: board size, colors, thresholds and
//! booster limits. Hosts may pass a partial object; missing fields default.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::TileColor;

/// Fixed rules of one game, supplied at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    /// How many of the tile colors are in play.
    pub color_count: usize,
    /// Smallest group a tap may clear.
    pub min_group: usize,
    /// Groups at least this large leave a super tile behind.
    pub super_tile_threshold: usize,
    pub target_score: u64,
    pub max_moves: u32,
    pub bomb_max_count: u32,
    pub teleport_max_count: u32,
    /// Chebyshev radius of the bomb blast.
    pub bomb_radius: usize,
    /// Total shuffles allowed per game before a stalemate is declared.
    pub max_reshuffle: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 9,
            cols: 9,
            color_count: 5,
            min_group: 2,
            super_tile_threshold: 5,
            target_score: 2000,
            max_moves: 20,
            bomb_max_count: 2,
            teleport_max_count: 2,
            bomb_radius: 1,
            max_reshuffle: 3,
        }
    }
}

impl GameConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Validation(
                "rows and cols must be > 0".into(),
            ));
        }
        if self.rows > u16::MAX as usize || self.cols > u16::MAX as usize {
            return Err(ConfigError::Validation(
                "rows and cols must fit in 16 bits".into(),
            ));
        }
        if self.color_count == 0 || self.color_count > TileColor::ALL.len() {
            return Err(ConfigError::Validation(format!(
                "color_count must be in [1, {}]",
                TileColor::ALL.len()
            )));
        }
        if self.min_group == 0 {
            return Err(ConfigError::Validation(
                "min_group must be >= 1".into(),
            ));
        }
        if self.super_tile_threshold < self.min_group {
            return Err(ConfigError::Validation(
                "super_tile_threshold must be >= min_group".into(),
            ));
        }
        if self.target_score == 0 {
            return Err(ConfigError::Validation(
                "target_score must be > 0".into(),
            ));
        }
        if self.max_moves == 0 {
            return Err(ConfigError::Validation(
                "max_moves must be > 0".into(),
            ));
        }
        Ok(())
    }
}
