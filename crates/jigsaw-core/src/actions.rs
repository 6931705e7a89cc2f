//! Input events a shell can send, and the events the engine reports back.

use crate::grid::{GridCell, Point};
use crate::piece::{PieceId, Rotation};
use crate::placement::DropRejection;
use serde::{Deserialize, Serialize};

/// All inputs the interaction state machine understands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PuzzleAction {
    /// Pick up a piece (only while nothing is held)
    Pick(PieceId),
    /// Centre the held piece on a pointer location
    MoveTo(Point),
    /// Put the held piece down, snapping it if it fits
    Release,
    /// Turn the held piece a quarter clockwise
    Rotate,
    /// Click on a piece: picks it up when idle, otherwise puts down the held piece
    Toggle(PieceId),
}

/// Things that happened as a result of an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PuzzleEvent {
    /// A piece was picked up and its rotation snapped to a quarter turn
    PiecePicked {
        piece: PieceId,
        rotation: Rotation,
        z_index: u32,
    },
    /// A placed piece was lifted out of its cell
    PieceLifted { piece: PieceId, cell: GridCell },
    /// The held piece followed the pointer
    PieceMoved { piece: PieceId, position: Point },
    /// The held piece turned
    PieceRotated { piece: PieceId, rotation: Rotation },
    /// The piece locked into a cell
    PiecePlaced {
        piece: PieceId,
        cell: GridCell,
        position: Point,
    },
    /// The piece was put down free-floating where it was released
    DropRejected {
        piece: PieceId,
        reason: DropRejection,
    },
}
