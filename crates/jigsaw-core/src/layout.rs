//! Puzzle layout: board placement, archetype assignment and random scatter.
//!
//! A new puzzle cuts the source image into `rows x columns` pieces, gives each
//! piece the archetype its grid position implies, and drops it at a random
//! spot in the play area that stays clear of the board.

use crate::config::PuzzleConfig;
use crate::edge::Archetype;
use crate::grid::{Board, Point, Rect};
use crate::piece::{Piece, PieceId, Rotation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while laying out pieces
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LayoutError {
    #[error("No free space to scatter a piece after {attempts} attempts")]
    NoRoomToScatter { attempts: u32 },
}

/// Archetype for the piece cut from (row, col) of a `rows x columns` grid.
///
/// Corner archetypes when the piece is on both a row edge and a column edge,
/// border archetypes when on exactly one, interior otherwise.
pub fn derive_archetype(row: u32, col: u32, rows: u32, columns: u32) -> Archetype {
    let top = row == 0;
    let bottom = row + 1 >= rows;
    let left = col == 0;
    let right = col + 1 >= columns;

    match (top, bottom, left, right) {
        (true, _, true, _) => Archetype::TopLeft,
        (true, _, _, true) => Archetype::TopRight,
        (true, _, _, _) => Archetype::TopMid,
        (_, true, true, _) => Archetype::BottomLeft,
        (_, true, _, true) => Archetype::BottomRight,
        (_, true, _, _) => Archetype::BottomMid,
        (_, _, true, _) => Archetype::MidLeft,
        (_, _, _, true) => Archetype::MidRight,
        _ => Archetype::MidMid,
    }
}

/// Board dimensions (width, height) for a grid of square pieces
pub fn board_size(rows: u32, columns: u32, piece_size: f64) -> (f64, f64) {
    (columns as f64 * piece_size, rows as f64 * piece_size)
}

/// Board centred in the configured play area
pub fn place_board(config: &PuzzleConfig) -> Board {
    let (width, height) = board_size(config.rows, config.columns, config.piece_size);
    let area = &config.play_area;
    let origin = Point::new(
        area.x + (area.width - width) / 2.0,
        area.y + (area.height - height) / 2.0,
    );
    Board::new(config.rows, config.columns, config.piece_size, origin)
}

/// Random top-left position for a piece inside `bounds` whose footprint
/// keeps a strict gap of `margin` to `board`.
///
/// Samples are drawn uniformly from `bounds` shrunk by `margin` and
/// `piece_size` on the far sides. After `max_attempts` rejections the margin
/// is dropped and the search runs once more before giving up.
pub fn scatter_position<R: Rng>(
    bounds: &Rect,
    board: &Rect,
    piece_size: f64,
    margin: f64,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Point, LayoutError> {
    if let Some(point) = sample_clear_of(bounds, board, piece_size, margin, max_attempts, rng) {
        return Ok(point);
    }

    warn!(
        margin,
        max_attempts, "Scatter exhausted its attempts, retrying without margin"
    );
    sample_clear_of(bounds, board, piece_size, 0.0, max_attempts, rng).ok_or(
        LayoutError::NoRoomToScatter {
            attempts: max_attempts.saturating_mul(2),
        },
    )
}

fn sample_clear_of<R: Rng>(
    bounds: &Rect,
    board: &Rect,
    piece_size: f64,
    margin: f64,
    max_attempts: u32,
    rng: &mut R,
) -> Option<Point> {
    let span_x = bounds.width - margin - piece_size;
    let span_y = bounds.height - margin - piece_size;
    if span_x <= 0.0 || span_y <= 0.0 {
        return None;
    }

    let keep_out = board.expand(margin);
    for _ in 0..max_attempts {
        let candidate = Point::new(
            bounds.x + rng.gen::<f64>() * span_x,
            bounds.y + rng.gen::<f64>() * span_y,
        );
        if Rect::square(candidate, piece_size).is_separated_from(&keep_out) {
            return Some(candidate);
        }
    }
    None
}

/// Cut the image into pieces and scatter them around `board`.
///
/// Ids are row-major, rotations are random whole degrees, and z-indices
/// start at 1 in creation order.
pub fn generate_pieces<R: Rng>(
    config: &PuzzleConfig,
    board: &Board,
    rng: &mut R,
) -> Result<Vec<Piece>, LayoutError> {
    let board_rect = board.bounds();
    let mut pieces = Vec::with_capacity(board.cell_count());

    for (index, home) in board.cells().enumerate() {
        let archetype = derive_archetype(home.row, home.col, board.rows, board.columns);
        let rotation = Rotation::from_degrees(rng.gen_range(0..360));
        let position = scatter_position(
            &config.play_area,
            &board_rect,
            config.piece_size,
            config.margin,
            config.max_scatter_attempts,
            rng,
        )?;

        let mut piece = Piece::new(PieceId(index as u32), home, archetype, rotation, position);
        piece.z_index = index as u32 + 1;
        pieces.push(piece);
    }

    debug!(count = pieces.len(), "Generated puzzle pieces");
    Ok(pieces)
}
