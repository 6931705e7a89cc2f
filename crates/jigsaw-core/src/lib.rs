//! Jigsaw board engine
//!
//! This crate provides the core logic for an interactive jigsaw board:
//! - Edge shapes and the archetype table every piece is cut from
//! - Board layout and random scatter of pieces around the board
//! - Grid snapping, occupancy and edge-compatibility checks on drop
//! - A pick / move / rotate / release state machine tying it together
//!
//! # Architecture
//!
//! The engine is platform-agnostic and performs no I/O. It can be compiled to:
//! - Native Rust behind the WebSocket host in `jigsaw-server`
//! - WebAssembly for a browser shell (`wasm` feature)
//!
//! # Modules
//!
//! - [`edge`]: Edge types, compatibility and the archetype table
//! - [`grid`]: Points, rectangles, cells, sides and the board
//! - [`piece`]: Pieces and rotation
//! - [`layout`]: Board placement, archetype assignment, scatter
//! - [`placement`]: Snap, occupancy and the drop algorithm
//! - [`session`]: The interaction state machine

pub mod actions;
pub mod config;
pub mod edge;
pub mod grid;
pub mod layout;
pub mod piece;
pub mod placement;
pub mod session;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{PuzzleAction, PuzzleEvent};
pub use config::{ConfigError, Difficulty, PuzzleConfig};
pub use edge::{compatible, effective_edge, Archetype, EdgeSignature, EdgeType};
pub use grid::{Board, GridCell, Point, Rect, Side};
pub use layout::{derive_archetype, scatter_position, LayoutError};
pub use piece::{Piece, PieceId, Rotation};
pub use placement::{
    check_placement, drop_piece, snap, validate, ConflictKind, DropOutcome, DropRejection,
    Occupancy, PlacementConflict,
};
pub use session::{InteractionState, PuzzleError, PuzzleSession, PuzzleSnapshot};
