//! Board geometry: points, rectangles, grid cells and compass sides.
//!
//! This module provides the foundational coordinate types for the puzzle board:
//! - `Point` and `Rect`: free-form screen-space geometry
//! - `GridCell`: integer (row, column) address of a board slot
//! - `Side`: the four compass sides of a cell or piece
//! - `Board`: the fixed `rows x columns` grid and its bounds
//!
//! Cells are addressed by integers so that occupancy never depends on
//! floating-point equality. Pixel positions are derived from a cell on demand.

use serde::{Deserialize, Serialize};

/// Compass side of a cell or piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in clockwise order starting from Top
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Position of this side in an edge signature (top=0, right=1, bottom=2, left=3)
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Side {
        Self::ALL[index % 4]
    }

    /// The side facing back from a neighbor
    pub fn opposite(self) -> Side {
        Side::from_index(self.index() + 2)
    }

    /// Row and column step towards the neighbor on this side
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Side::Top => (-1, 0),
            Side::Right => (0, 1),
            Side::Bottom => (1, 0),
            Side::Left => (0, -1),
        }
    }
}

/// A point in the shell's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` with its top-left corner at `origin`
    pub const fn square(origin: Point, size: f64) -> Self {
        Self::new(origin.x, origin.y, size, size)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Horizontal extent shared with `other` (zero when disjoint)
    pub fn overlap_width(&self, other: &Rect) -> f64 {
        (self.right().min(other.right()) - self.x.max(other.x)).max(0.0)
    }

    /// Vertical extent shared with `other` (zero when disjoint)
    pub fn overlap_height(&self, other: &Rect) -> f64 {
        (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0.0)
    }

    /// True when a strict gap separates the two rectangles on some axis.
    /// Touching edges count as overlapping.
    pub fn is_separated_from(&self, other: &Rect) -> bool {
        self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom()
    }
}

/// Integer address of a board slot
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
}

impl GridCell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The fixed grid pieces are dropped onto.
///
/// Every cell is a `piece_size` square; the board's top-left corner sits at
/// `origin` in the same coordinate space as piece positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub rows: u32,
    pub columns: u32,
    pub piece_size: f64,
    pub origin: Point,
}

impl Board {
    pub fn new(rows: u32, columns: u32, piece_size: f64, origin: Point) -> Self {
        Self {
            rows,
            columns,
            piece_size,
            origin,
        }
    }

    pub fn width(&self) -> f64 {
        self.columns as f64 * self.piece_size
    }

    pub fn height(&self) -> f64 {
        self.rows as f64 * self.piece_size
    }

    /// Absolute footprint of the board
    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.width(), self.height())
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.row < self.rows && cell.col < self.columns
    }

    /// The neighboring cell on `side`, or None when it falls off the board
    pub fn neighbor(&self, cell: GridCell, side: Side) -> Option<GridCell> {
        let (d_row, d_col) = side.offset();
        let row = cell.row as i64 + d_row;
        let col = cell.col as i64 + d_col;
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.columns as i64 {
            return None;
        }
        Some(GridCell::new(row as u32, col as u32))
    }

    /// Whether the cell touches the board perimeter
    pub fn is_boundary(&self, cell: GridCell) -> bool {
        Side::ALL
            .iter()
            .any(|&side| self.neighbor(cell, side).is_none())
    }

    /// Grid-aligned top-left position of a cell
    pub fn cell_position(&self, cell: GridCell) -> Point {
        Point::new(
            self.origin.x + cell.col as f64 * self.piece_size,
            self.origin.y + cell.row as f64 * self.piece_size,
        )
    }

    /// Centre of a cell, i.e. the pointer location that drops a piece onto it
    pub fn cell_center(&self, cell: GridCell) -> Point {
        let top_left = self.cell_position(cell);
        let half = self.piece_size / 2.0;
        Point::new(top_left.x + half, top_left.y + half)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| GridCell::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_3x4() -> Board {
        Board::new(3, 4, 50.0, Point::new(100.0, 200.0))
    }

    #[test]
    fn test_side_opposites() {
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Side::Right.opposite(), Side::Left);
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn test_interior_cell_has_four_neighbors() {
        let board = board_3x4();
        let cell = GridCell::new(1, 1);
        let neighbors: Vec<_> = Side::ALL
            .iter()
            .filter_map(|&s| board.neighbor(cell, s))
            .collect();
        assert_eq!(
            neighbors,
            vec![
                GridCell::new(0, 1),
                GridCell::new(1, 2),
                GridCell::new(2, 1),
                GridCell::new(1, 0)
            ]
        );
        assert!(!board.is_boundary(cell));
    }

    #[test]
    fn test_corner_neighbors_fall_off_board() {
        let board = board_3x4();
        let corner = GridCell::new(2, 3);
        assert_eq!(board.neighbor(corner, Side::Bottom), None);
        assert_eq!(board.neighbor(corner, Side::Right), None);
        assert_eq!(board.neighbor(corner, Side::Top), Some(GridCell::new(1, 3)));
        assert!(board.is_boundary(corner));
    }

    #[test]
    fn test_cell_position_is_grid_aligned() {
        let board = board_3x4();
        assert_eq!(board.cell_position(GridCell::new(0, 0)), Point::new(100.0, 200.0));
        assert_eq!(board.cell_position(GridCell::new(2, 3)), Point::new(250.0, 300.0));
        assert_eq!(board.cell_center(GridCell::new(0, 0)), Point::new(125.0, 225.0));
        assert_eq!(board.cells().count(), board.cell_count());
    }

    #[test]
    fn test_rect_overlap_and_separation() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(7.0, 4.0, 10.0, 10.0);
        assert_eq!(a.overlap_width(&b), 3.0);
        assert_eq!(a.overlap_height(&b), 6.0);
        assert!(!a.is_separated_from(&b));

        let far = Rect::new(20.0, 0.0, 5.0, 5.0);
        assert_eq!(a.overlap_width(&far), 0.0);
        assert!(a.is_separated_from(&far));

        // Touching edges are not a gap
        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(!a.is_separated_from(&touching));
    }
}
