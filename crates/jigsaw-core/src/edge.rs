//! Edge shapes and the piece archetype table.
//!
//! Every piece has four edges, each FLAT (board boundary), TAB (sticks out)
//! or BLANK (cut in). Which edges a piece has depends only on where it came
//! from in the source grid, so the nine archetypes below cover every piece.

use crate::grid::Side;
use crate::piece::Piece;
use serde::{Deserialize, Serialize};

/// Shape of a single piece edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Straight edge, only found on the board perimeter
    Flat,
    /// Knob sticking out of the piece
    Tab,
    /// Socket cut into the piece
    Blank,
}

impl EdgeType {
    /// The only edge type that may abut this one
    pub fn complement(self) -> EdgeType {
        match self {
            EdgeType::Flat => EdgeType::Flat,
            EdgeType::Tab => EdgeType::Blank,
            EdgeType::Blank => EdgeType::Tab,
        }
    }
}

/// Edge types in (top, right, bottom, left) order, unrotated
pub type EdgeSignature = [EdgeType; 4];

/// Whether two edges may legally touch: FLAT/FLAT or TAB/BLANK in either order
pub fn compatible(a: EdgeType, b: EdgeType) -> bool {
    a.complement() == b
}

/// Edge facing `side` once a signature is turned clockwise by `quarter_turns`
pub fn rotated_edge(signature: &EdgeSignature, quarter_turns: u8, side: Side) -> EdgeType {
    let turns = (quarter_turns % 4) as usize;
    signature[(side.index() + 4 - turns) % 4]
}

/// Edge a piece currently presents on `side`, taking its rotation into account
pub fn effective_edge(piece: &Piece, side: Side) -> EdgeType {
    rotated_edge(
        &piece.archetype().edge_signature(),
        piece.rotation.quarter_turns(),
        side,
    )
}

/// Shape class of a piece, fixed by its position in the source grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    TopLeft,
    TopMid,
    TopRight,
    MidLeft,
    MidMid,
    MidRight,
    BottomLeft,
    BottomMid,
    BottomRight,
}

impl Archetype {
    /// All archetypes in row-major order of the 3x3 pattern
    pub const ALL: [Archetype; 9] = [
        Archetype::TopLeft,
        Archetype::TopMid,
        Archetype::TopRight,
        Archetype::MidLeft,
        Archetype::MidMid,
        Archetype::MidRight,
        Archetype::BottomLeft,
        Archetype::BottomMid,
        Archetype::BottomRight,
    ];

    /// Unrotated edges (top, right, bottom, left).
    ///
    /// Seams run the same way across the whole image: right edges are BLANK
    /// and left edges TAB, bottom edges TAB and top edges BLANK, so the solved
    /// picture is a valid arrangement.
    pub fn edge_signature(self) -> EdgeSignature {
        use EdgeType::{Blank, Flat, Tab};
        match self {
            Archetype::TopLeft => [Flat, Blank, Tab, Flat],
            Archetype::TopMid => [Flat, Blank, Tab, Tab],
            Archetype::TopRight => [Flat, Flat, Tab, Tab],
            Archetype::MidLeft => [Blank, Blank, Tab, Flat],
            Archetype::MidMid => [Blank, Blank, Tab, Tab],
            Archetype::MidRight => [Blank, Flat, Tab, Tab],
            Archetype::BottomLeft => [Blank, Blank, Flat, Flat],
            Archetype::BottomMid => [Blank, Blank, Flat, Tab],
            Archetype::BottomRight => [Blank, Flat, Flat, Tab],
        }
    }

    /// Number of FLAT edges: 2 for corners, 1 for border pieces, 0 inside
    pub fn flat_count(self) -> usize {
        self.edge_signature()
            .iter()
            .filter(|&&e| e == EdgeType::Flat)
            .count()
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Archetype::TopLeft | Archetype::TopRight | Archetype::BottomLeft | Archetype::BottomRight
        )
    }

    pub fn is_interior(self) -> bool {
        self == Archetype::MidMid
    }
}
