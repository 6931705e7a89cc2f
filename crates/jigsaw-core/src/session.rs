//! Interaction state machine.
//!
//! This module contains `PuzzleSession`, which owns the board, the pieces and
//! the occupancy map, and mediates pick-up, movement, rotation and drops.
//! At most one piece is held at a time.

use crate::actions::{PuzzleAction, PuzzleEvent};
use crate::config::{ConfigError, PuzzleConfig};
use crate::grid::{Board, GridCell, Point};
use crate::layout::{self, LayoutError};
use crate::piece::{Piece, PieceId, Rotation};
use crate::placement::{self, DropOutcome, Occupancy};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Whether a piece is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionState {
    /// Nothing held
    Idle,
    /// Pointer movement is routed to this piece
    Held(PieceId),
}

/// Errors that can occur when driving a session
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum PuzzleError {
    #[error("No piece with id {0}")]
    UnknownPiece(PieceId),

    #[error("Already holding piece {0}")]
    AlreadyHolding(PieceId),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
}

/// A single player's puzzle in progress
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    config: PuzzleConfig,
    board: Board,
    /// Indexed by `PieceId`
    pieces: Vec<Piece>,
    occupancy: Occupancy,
    state: InteractionState,
    /// Stacking counter; only ever grows
    highest_z: u32,
}

/// JSON-friendly view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSnapshot {
    pub board: Board,
    pub pieces: Vec<Piece>,
    pub active_piece: Option<PieceId>,
    pub placed: Vec<(GridCell, PieceId)>,
    pub highest_z_index: u32,
}

impl PuzzleSession {
    /// Lay out a new puzzle
    pub fn new<R: Rng>(config: PuzzleConfig, rng: &mut R) -> Result<Self, PuzzleError> {
        config.validate()?;
        let board = layout::place_board(&config);
        let pieces = layout::generate_pieces(&config, &board, rng)?;
        let highest_z = pieces.iter().map(|p| p.z_index).max().unwrap_or(0);

        debug!(
            rows = config.rows,
            columns = config.columns,
            pieces = pieces.len(),
            "Puzzle initialized"
        );

        Ok(Self {
            config,
            board,
            pieces,
            occupancy: Occupancy::new(),
            state: InteractionState::Idle,
            highest_z,
        })
    }

    /// Discard every piece and lay out a fresh puzzle (difficulty change or new image).
    ///
    /// On error the current puzzle is left untouched.
    pub fn reset<R: Rng>(&mut self, config: PuzzleConfig, rng: &mut R) -> Result<(), PuzzleError> {
        *self = Self::new(config, rng)?;
        Ok(())
    }

    /// Apply an input event
    pub fn apply_action(&mut self, action: PuzzleAction) -> Result<Vec<PuzzleEvent>, PuzzleError> {
        match action {
            PuzzleAction::Pick(id) => self.pick(id),
            PuzzleAction::MoveTo(point) => Ok(self.move_to(point)),
            PuzzleAction::Release => Ok(self.release()),
            PuzzleAction::Rotate => Ok(self.rotate()),
            PuzzleAction::Toggle(id) => self.toggle(id),
        }
    }

    /// Pick up a piece.
    ///
    /// The piece's rotation snaps to the nearest quarter turn, it moves to the
    /// top of the stack, and a placed piece gives up its cell.
    pub fn pick(&mut self, id: PieceId) -> Result<Vec<PuzzleEvent>, PuzzleError> {
        if let InteractionState::Held(held) = self.state {
            return Err(PuzzleError::AlreadyHolding(held));
        }
        if self.pieces.get(id.index()).is_none() {
            return Err(PuzzleError::UnknownPiece(id));
        }

        self.highest_z += 1;
        let z_index = self.highest_z;
        let mut events = Vec::new();

        let piece = &mut self.pieces[id.index()];
        piece.z_index = z_index;
        piece.rotation = piece.rotation.snapped();
        let rotation = piece.rotation;

        if let Some(cell) = piece.cell() {
            piece.set_cell(None);
            self.occupancy.vacate(cell);
            events.push(PuzzleEvent::PieceLifted { piece: id, cell });
        }

        self.state = InteractionState::Held(id);
        debug!(piece = %id, rotation = rotation.degrees(), "Picked up piece");
        events.insert(
            0,
            PuzzleEvent::PiecePicked {
                piece: id,
                rotation,
                z_index,
            },
        );
        Ok(events)
    }

    /// Centre the held piece on `point`. No-op when idle.
    pub fn move_to(&mut self, point: Point) -> Vec<PuzzleEvent> {
        let Some(id) = self.active_piece() else {
            return Vec::new();
        };
        let size = self.board.piece_size;
        let piece = &mut self.pieces[id.index()];
        piece.center_on(point, size);
        vec![PuzzleEvent::PieceMoved {
            piece: id,
            position: piece.position,
        }]
    }

    /// Turn the held piece a quarter clockwise. No-op when idle.
    pub fn rotate(&mut self) -> Vec<PuzzleEvent> {
        let Some(id) = self.active_piece() else {
            return Vec::new();
        };
        let piece = &mut self.pieces[id.index()];
        piece.rotation = piece.rotation.rotated_clockwise();
        vec![PuzzleEvent::PieceRotated {
            piece: id,
            rotation: piece.rotation,
        }]
    }

    /// Put the held piece down and return to idle whatever the drop outcome.
    /// No-op when idle.
    pub fn release(&mut self) -> Vec<PuzzleEvent> {
        let Some(id) = self.active_piece() else {
            return Vec::new();
        };
        self.state = InteractionState::Idle;

        let outcome = placement::drop_piece(
            &self.pieces[id.index()],
            &self.board,
            &self.occupancy,
            &self.pieces,
        );

        let event = match outcome {
            DropOutcome::Placed(cell) => {
                let position = self.board.cell_position(cell);
                let piece = &mut self.pieces[id.index()];
                piece.position = position;
                piece.set_cell(Some(cell));
                self.occupancy.occupy(cell, id);
                debug!(piece = %id, %cell, "Piece placed");
                PuzzleEvent::PiecePlaced {
                    piece: id,
                    cell,
                    position,
                }
            }
            DropOutcome::Rejected(reason) => {
                debug!(piece = %id, ?reason, "Drop rejected");
                PuzzleEvent::DropRejected { piece: id, reason }
            }
        };
        vec![event]
    }

    /// Click handling: pick up `id` when idle, otherwise put down whatever is
    /// held, regardless of which piece was clicked.
    pub fn toggle(&mut self, id: PieceId) -> Result<Vec<PuzzleEvent>, PuzzleError> {
        match self.state {
            InteractionState::Idle => self.pick(id),
            InteractionState::Held(_) => Ok(self.release()),
        }
    }

    // ==================== Queries ====================

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn active_piece(&self) -> Option<PieceId> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Held(id) => Some(id),
        }
    }

    pub fn highest_z_index(&self) -> u32 {
        self.highest_z
    }

    pub fn current_position(&self, id: PieceId) -> Option<Point> {
        self.piece(id).map(|p| p.position)
    }

    pub fn current_rotation(&self, id: PieceId) -> Option<Rotation> {
        self.piece(id).map(|p| p.rotation)
    }

    pub fn is_placed(&self, id: PieceId) -> bool {
        self.piece(id).is_some_and(Piece::is_placed)
    }

    /// Piece locked into `cell`, if any
    pub fn piece_at(&self, cell: GridCell) -> Option<PieceId> {
        self.occupancy.is_occupied(cell)
    }

    pub fn placed_count(&self) -> usize {
        self.occupancy.len()
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        PuzzleSnapshot {
            board: self.board,
            pieces: self.pieces.clone(),
            active_piece: self.active_piece(),
            placed: self.occupancy.entries(),
            highest_z_index: self.highest_z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use crate::edge::Archetype;
    use crate::placement::DropRejection;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> PuzzleSession {
        let mut rng = StdRng::seed_from_u64(1234);
        PuzzleSession::new(PuzzleConfig::from_difficulty(Difficulty::Easy), &mut rng).unwrap()
    }

    #[test]
    fn test_new_session_starts_idle() {
        let session = session();
        assert_eq!(session.state(), InteractionState::Idle);
        assert_eq!(session.pieces().len(), 12);
        assert_eq!(session.placed_count(), 0);
        assert_eq!(session.highest_z_index(), 12);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PuzzleConfig::default().with_grid(1, 3);
        assert_eq!(
            PuzzleSession::new(config, &mut rng).err(),
            Some(PuzzleError::Config(ConfigError::TooFewRows(1)))
        );
    }

    #[test]
    fn test_pick_snaps_rotation_and_raises_piece() {
        let mut session = session();
        let id = PieceId(5);
        let events = session.pick(id).unwrap();

        let piece = session.piece(id).unwrap();
        assert!(piece.rotation.is_axis_aligned());
        assert_eq!(piece.z_index, 13);
        assert_eq!(session.state(), InteractionState::Held(id));
        assert_eq!(
            events,
            vec![PuzzleEvent::PiecePicked {
                piece: id,
                rotation: piece.rotation,
                z_index: 13
            }]
        );
    }

    #[test]
    fn test_pick_while_holding_is_rejected() {
        let mut session = session();
        session.pick(PieceId(0)).unwrap();
        assert_eq!(
            session.pick(PieceId(1)),
            Err(PuzzleError::AlreadyHolding(PieceId(0)))
        );
        assert_eq!(session.active_piece(), Some(PieceId(0)));
    }

    #[test]
    fn test_pick_unknown_piece() {
        let mut session = session();
        assert_eq!(
            session.pick(PieceId(99)),
            Err(PuzzleError::UnknownPiece(PieceId(99)))
        );
        assert_eq!(session.state(), InteractionState::Idle);
        assert_eq!(session.highest_z_index(), 12);
    }

    #[test]
    fn test_idle_inputs_are_noops() {
        let mut session = session();
        let before = session.snapshot();
        assert!(session.move_to(Point::new(10.0, 10.0)).is_empty());
        assert!(session.rotate().is_empty());
        assert!(session.release().is_empty());
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_move_centres_piece_on_pointer() {
        let mut session = session();
        session.pick(PieceId(3)).unwrap();
        session.move_to(Point::new(300.0, 200.0));
        assert_eq!(
            session.current_position(PieceId(3)),
            Some(Point::new(275.0, 175.0))
        );
    }

    #[test]
    fn test_rotate_turns_held_piece() {
        let mut session = session();
        session.pick(PieceId(2)).unwrap();
        let start = session.current_rotation(PieceId(2)).unwrap();
        session.rotate();
        assert_eq!(
            session.current_rotation(PieceId(2)),
            Some(start.rotated_clockwise())
        );
    }

    #[test]
    fn test_release_off_board_leaves_piece_free() {
        let mut session = session();
        let id = PieceId(0);
        session.pick(id).unwrap();
        session.move_to(Point::new(30.0, 30.0));
        let events = session.release();

        assert_eq!(
            events,
            vec![PuzzleEvent::DropRejected {
                piece: id,
                reason: DropRejection::OffBoard
            }]
        );
        assert_eq!(session.state(), InteractionState::Idle);
        assert_eq!(session.current_position(id), Some(Point::new(5.0, 5.0)));
        assert!(!session.is_placed(id));
    }

    #[test]
    fn test_toggle_releases_whatever_is_held() {
        let mut session = session();
        session.toggle(PieceId(1)).unwrap();
        assert_eq!(session.active_piece(), Some(PieceId(1)));

        let events = session.toggle(PieceId(7)).unwrap();
        assert_eq!(session.state(), InteractionState::Idle);
        assert!(matches!(
            events.as_slice(),
            [PuzzleEvent::DropRejected { piece: PieceId(1), .. }]
        ));
    }

    #[test]
    fn test_corner_placed_then_lifted() {
        let mut session = session();
        let id = session
            .pieces()
            .iter()
            .find(|p| p.archetype() == Archetype::TopLeft)
            .map(Piece::id)
            .unwrap();

        session.pick(id).unwrap();
        while session.current_rotation(id) != Some(Rotation::ZERO) {
            session.rotate();
        }
        let target = GridCell::new(0, 0);
        let center = session.board().cell_center(target);
        session.move_to(center);
        session.release();

        assert!(session.is_placed(id));
        assert_eq!(session.piece_at(target), Some(id));
        assert_eq!(
            session.current_position(id),
            Some(session.board().cell_position(target))
        );

        let events = session.pick(id).unwrap();
        assert!(events.contains(&PuzzleEvent::PieceLifted {
            piece: id,
            cell: target
        }));
        assert!(!session.is_placed(id));
        assert_eq!(session.piece_at(target), None);
    }

    #[test]
    fn test_reset_regenerates_pieces() {
        let mut session = session();
        session.pick(PieceId(0)).unwrap();

        let mut rng = StdRng::seed_from_u64(99);
        session
            .reset(PuzzleConfig::from_difficulty(Difficulty::Hard), &mut rng)
            .unwrap();
        assert_eq!(session.pieces().len(), 108);
        assert_eq!(session.state(), InteractionState::Idle);

        let bad = PuzzleConfig::default().with_grid(0, 0);
        assert!(session.reset(bad, &mut rng).is_err());
        assert_eq!(session.pieces().len(), 108);
    }
}
