//! Placement validation: snapping, occupancy and edge matching.
//!
//! A drop goes through three gates, in order:
//! 1. `snap` - the piece must overlap the board by more than half its width
//!    and half its height; its position is rounded to the nearest cell.
//! 2. occupancy - the cell must not hold another piece.
//! 3. `check_placement` - every side must agree with what it faces: FLAT
//!    against the board edge, TAB/BLANK towards an empty cell, and a
//!    compatible edge against an occupied neighbor.
//!
//! Failing any gate leaves the piece where it was released.

use crate::edge::{compatible, EdgeType};
use crate::grid::{Board, GridCell, Point, Rect, Side};
use crate::piece::{Piece, PieceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which pieces sit in which board cells.
///
/// Keyed by integer cell so two placements are the same slot exactly when
/// their (row, column) match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    cells: HashMap<GridCell, PieceId>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The piece holding `cell`, if any
    pub fn is_occupied(&self, cell: GridCell) -> Option<PieceId> {
        self.cells.get(&cell).copied()
    }

    /// Record `piece` in `cell`, returning any piece that was already there
    pub fn occupy(&mut self, cell: GridCell, piece: PieceId) -> Option<PieceId> {
        self.cells.insert(cell, piece)
    }

    pub fn vacate(&mut self, cell: GridCell) -> Option<PieceId> {
        self.cells.remove(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Occupied cells in row-major order
    pub fn entries(&self) -> Vec<(GridCell, PieceId)> {
        let mut entries: Vec<_> = self.cells.iter().map(|(&c, &p)| (c, p)).collect();
        entries.sort_unstable();
        entries
    }
}

/// Why a side of a candidate placement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A non-flat edge faces off the board
    BoundaryNotFlat,
    /// A flat edge faces an empty cell inside the board
    FlatFacingInterior,
    /// The occupied neighbor presents an incompatible edge
    EdgeMismatch {
        neighbor: PieceId,
        ours: EdgeType,
        theirs: EdgeType,
    },
}

/// First side of a candidate placement that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConflict {
    pub cell: GridCell,
    pub side: Side,
    pub kind: ConflictKind,
}

/// Why a drop did not lock the piece into the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropRejection {
    /// Half or less of the piece overlapped the board
    OffBoard,
    /// The snapped cell already holds another piece
    Occupied { cell: GridCell, by: PieceId },
    /// The piece's edges do not fit its surroundings
    Incompatible(PlacementConflict),
}

/// Result of the drop algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    Placed(GridCell),
    Rejected(DropRejection),
}

/// Check every side of `piece` as if it sat in `cell`.
///
/// `pieces` is indexed by piece id and resolves occupied neighbors.
pub fn check_placement(
    piece: &Piece,
    cell: GridCell,
    board: &Board,
    occupancy: &Occupancy,
    pieces: &[Piece],
) -> Result<(), PlacementConflict> {
    for side in Side::ALL {
        let ours = piece.effective_edge(side);
        let conflict = |kind| PlacementConflict { cell, side, kind };

        let Some(neighbor_cell) = board.neighbor(cell, side) else {
            if ours != EdgeType::Flat {
                return Err(conflict(ConflictKind::BoundaryNotFlat));
            }
            continue;
        };

        let neighbor = occupancy
            .is_occupied(neighbor_cell)
            .filter(|&id| id != piece.id())
            .and_then(|id| pieces.get(id.index()));

        match neighbor {
            None => {
                // Flat edges only ever belong on the perimeter
                if ours == EdgeType::Flat {
                    return Err(conflict(ConflictKind::FlatFacingInterior));
                }
            }
            Some(other) => {
                let theirs = other.effective_edge(side.opposite());
                if !compatible(ours, theirs) {
                    return Err(conflict(ConflictKind::EdgeMismatch {
                        neighbor: other.id(),
                        ours,
                        theirs,
                    }));
                }
            }
        }
    }
    Ok(())
}

/// Whether `piece` may occupy `cell` given its surroundings
pub fn validate(
    piece: &Piece,
    cell: GridCell,
    board: &Board,
    occupancy: &Occupancy,
    pieces: &[Piece],
) -> bool {
    check_placement(piece, cell, board, occupancy, pieces).is_ok()
}

/// Board cell a piece released at `position` snaps to.
///
/// None unless the footprint overlaps the board by more than 50% of its width
/// and more than 50% of its height, or if the position is not finite. The rounded cell is clamped so the piece
/// stays fully on the board.
pub fn snap(position: Point, board: &Board) -> Option<GridCell> {
    if !(position.x.is_finite() && position.y.is_finite()) {
        return None;
    }

    let size = board.piece_size;
    let footprint = Rect::square(position, size);
    let bounds = board.bounds();

    let enough_x = footprint.overlap_width(&bounds) / size > 0.5;
    let enough_y = footprint.overlap_height(&bounds) / size > 0.5;
    if !(enough_x && enough_y) {
        return None;
    }

    let col = nearest_index((position.x - board.origin.x) / size, board.columns);
    let row = nearest_index((position.y - board.origin.y) / size, board.rows);
    Some(GridCell::new(row, col))
}

fn nearest_index(offset: f64, count: u32) -> u32 {
    let max = count.saturating_sub(1) as f64;
    offset.round().clamp(0.0, max) as u32
}

/// Run the full drop algorithm for `piece` at its current position.
///
/// Pure: committing a `Placed` outcome is up to the caller.
pub fn drop_piece(
    piece: &Piece,
    board: &Board,
    occupancy: &Occupancy,
    pieces: &[Piece],
) -> DropOutcome {
    let Some(cell) = snap(piece.position, board) else {
        return DropOutcome::Rejected(DropRejection::OffBoard);
    };

    if let Some(by) = occupancy.is_occupied(cell).filter(|&id| id != piece.id()) {
        return DropOutcome::Rejected(DropRejection::Occupied { cell, by });
    }

    match check_placement(piece, cell, board, occupancy, pieces) {
        Ok(()) => DropOutcome::Placed(cell),
        Err(conflict) => DropOutcome::Rejected(DropRejection::Incompatible(conflict)),
    }
}
