//! Puzzle configuration and difficulty presets.

use crate::grid::Rect;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Side length of a piece when nothing else is configured
pub const DEFAULT_PIECE_SIZE: f64 = 50.0;

/// Gap kept between scattered pieces and the board
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Rejected scatter samples tolerated before the margin is relaxed
pub const DEFAULT_MAX_SCATTER_ATTEMPTS: u32 = 10_000;

/// Smallest grid dimension the archetype table can express
pub const MIN_GRID_DIMENSION: u32 = 2;

/// Difficulty presets offered by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Grid size as (rows, columns)
    pub fn grid(self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (3, 4),
            Difficulty::Medium => (6, 8),
            Difficulty::Hard => (9, 12),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    /// Parse a preset by its serialized name ("Easy", "Medium", "Hard")
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .map_err(|_| ConfigError::UnknownDifficulty(name.to_string()))
    }
}

/// Errors for configurations the engine refuses to lay out
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Unknown difficulty: {0:?}")]
    UnknownDifficulty(String),

    #[error("Need at least 2 rows, got {0}")]
    TooFewRows(u32),

    #[error("Need at least 2 columns, got {0}")]
    TooFewColumns(u32),

    #[error("Piece size must be positive and finite, got {0}")]
    InvalidPieceSize(f64),

    #[error("Margin must be non-negative and finite, got {0}")]
    InvalidMargin(f64),

    #[error("Board ({board_width}x{board_height}) does not fit the play area ({area_width}x{area_height})")]
    BoardExceedsPlayArea {
        board_width: f64,
        board_height: f64,
        area_width: f64,
        area_height: f64,
    },
}

/// Everything needed to lay out a new puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub rows: u32,
    pub columns: u32,
    /// Side length of a piece and of a board cell
    pub piece_size: f64,
    /// Gap kept between scattered pieces and the board
    pub margin: f64,
    /// Region pieces may be scattered in; the board is centred inside it
    pub play_area: Rect,
    /// Rejected scatter samples tolerated before relaxing the margin
    pub max_scatter_attempts: u32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

impl PuzzleConfig {
    pub fn new(rows: u32, columns: u32, piece_size: f64, play_area: Rect) -> Self {
        Self {
            rows,
            columns,
            piece_size,
            margin: DEFAULT_MARGIN,
            play_area,
            max_scatter_attempts: DEFAULT_MAX_SCATTER_ATTEMPTS,
        }
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let (rows, columns) = difficulty.grid();
        Self::new(
            rows,
            columns,
            DEFAULT_PIECE_SIZE,
            Rect::new(0.0, 0.0, 1200.0, 800.0),
        )
    }

    /// Same play area and piece size, different grid
    pub fn with_grid(mut self, rows: u32, columns: u32) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    pub fn piece_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_GRID_DIMENSION {
            return Err(ConfigError::TooFewRows(self.rows));
        }
        if self.columns < MIN_GRID_DIMENSION {
            return Err(ConfigError::TooFewColumns(self.columns));
        }
        if !self.piece_size.is_finite() || self.piece_size <= 0.0 {
            return Err(ConfigError::InvalidPieceSize(self.piece_size));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::InvalidMargin(self.margin));
        }

        let board_width = self.columns as f64 * self.piece_size;
        let board_height = self.rows as f64 * self.piece_size;
        if board_width > self.play_area.width || board_height > self.play_area.height {
            return Err(ConfigError::BoardExceedsPlayArea {
                board_width,
                board_height,
                area_width: self.play_area.width,
                area_height: self.play_area.height,
            });
        }

        Ok(())
    }
}
