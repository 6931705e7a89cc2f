//! Puzzle pieces and their rotation.

use crate::edge::{self, Archetype, EdgeSignature, EdgeType};
use crate::grid::{GridCell, Point, Rect, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable piece identifier: the piece's row-major index in the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl PieceId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rotation in whole degrees, normalised into [0, 360).
///
/// Freshly scattered pieces may sit at any angle; edge lookups always use the
/// nearest quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(u16);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    pub fn from_degrees(degrees: i32) -> Self {
        Rotation(degrees.rem_euclid(360) as u16)
    }

    pub fn from_quarter_turns(turns: u8) -> Self {
        Rotation((turns % 4) as u16 * 90)
    }

    pub const fn degrees(self) -> u16 {
        self.0
    }

    /// Nearest quarter turn, rounding halfway angles up (45 -> 1)
    pub fn quarter_turns(self) -> u8 {
        (((self.0 as u32 + 45) / 90) % 4) as u8
    }

    /// Rotation rounded to the nearest multiple of 90
    pub fn snapped(self) -> Rotation {
        Rotation::from_quarter_turns(self.quarter_turns())
    }

    pub fn is_axis_aligned(self) -> bool {
        self.0 % 90 == 0
    }

    /// One quarter turn clockwise, wrapping at 360
    pub fn rotated_clockwise(self) -> Rotation {
        Rotation::from_degrees(self.0 as i32 + 90)
    }
}

/// A single puzzle piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    archetype: Archetype,
    /// Cell this piece was cut from in the source image
    home: GridCell,
    /// Current rotation
    pub rotation: Rotation,
    /// Top-left corner in shell coordinates
    pub position: Point,
    /// Committed board cell, if the piece is placed
    cell: Option<GridCell>,
    /// Visual stacking order; larger draws on top
    pub z_index: u32,
}

impl Piece {
    pub fn new(
        id: PieceId,
        home: GridCell,
        archetype: Archetype,
        rotation: Rotation,
        position: Point,
    ) -> Self {
        Self {
            id,
            archetype,
            home,
            rotation,
            position,
            cell: None,
            z_index: 0,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn home(&self) -> GridCell {
        self.home
    }

    pub fn edge_signature(&self) -> EdgeSignature {
        self.archetype.edge_signature()
    }

    /// Edge currently facing `side`
    pub fn effective_edge(&self, side: Side) -> EdgeType {
        edge::effective_edge(self, side)
    }

    /// Effective edges in (top, right, bottom, left) order
    pub fn effective_signature(&self) -> EdgeSignature {
        Side::ALL.map(|side| self.effective_edge(side))
    }

    /// Board cell the piece is locked into
    pub fn cell(&self) -> Option<GridCell> {
        self.cell
    }

    pub fn is_placed(&self) -> bool {
        self.cell.is_some()
    }

    pub(crate) fn set_cell(&mut self, cell: Option<GridCell>) {
        self.cell = cell;
    }

    /// On-screen square the piece covers
    pub fn footprint(&self, piece_size: f64) -> Rect {
        Rect::square(self.position, piece_size)
    }

    /// Move the piece so its centre sits on `point`
    pub fn center_on(&mut self, point: Point, piece_size: f64) {
        let half = piece_size / 2.0;
        self.position = Point::new(point.x - half, point.y - half);
    }
}
