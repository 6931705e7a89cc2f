//! Per-connection puzzle sessions.

use jigsaw_core::{
    Difficulty, PuzzleAction, PuzzleConfig, PuzzleError, PuzzleEvent, PuzzleSession,
    PuzzleSnapshot,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No puzzle in progress")]
    NoPuzzle,

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

/// One connected client and the puzzle it is working on.
///
/// Puzzles are private to their connection; nothing here is shared.
pub struct PlayerSession {
    /// Layout used when the client does not ask for anything specific
    defaults: PuzzleConfig,
    puzzle: Option<PuzzleSession>,
    rng: StdRng,
}

impl PlayerSession {
    pub fn new(defaults: PuzzleConfig) -> Self {
        Self {
            defaults,
            puzzle: None,
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn with_seed(defaults: PuzzleConfig, seed: u64) -> Self {
        Self {
            defaults,
            puzzle: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[cfg(test)]
    pub fn has_puzzle(&self) -> bool {
        self.puzzle.is_some()
    }

    /// Lay out a new puzzle, discarding any puzzle in progress.
    ///
    /// A difficulty picks the grid; explicit rows and columns win over it.
    pub fn start_puzzle(
        &mut self,
        difficulty: Option<Difficulty>,
        rows: Option<u32>,
        columns: Option<u32>,
    ) -> Result<PuzzleSnapshot, SessionError> {
        let (preset_rows, preset_columns) = difficulty
            .map(Difficulty::grid)
            .unwrap_or((self.defaults.rows, self.defaults.columns));
        let config = self.defaults.clone().with_grid(
            rows.unwrap_or(preset_rows),
            columns.unwrap_or(preset_columns),
        );

        match self.puzzle.as_mut() {
            Some(puzzle) => puzzle.reset(config, &mut self.rng)?,
            None => self.puzzle = Some(PuzzleSession::new(config, &mut self.rng)?),
        }
        self.snapshot().ok_or(SessionError::NoPuzzle)
    }

    /// Parse and apply a puzzle action
    pub fn apply_action(
        &mut self,
        action: serde_json::Value,
    ) -> Result<Vec<PuzzleEvent>, SessionError> {
        let puzzle = self.puzzle.as_mut().ok_or(SessionError::NoPuzzle)?;

        let action: PuzzleAction = serde_json::from_value(action)
            .map_err(|e| SessionError::InvalidAction(e.to_string()))?;

        Ok(puzzle.apply_action(action)?)
    }

    pub fn snapshot(&self) -> Option<PuzzleSnapshot> {
        self.puzzle.as_ref().map(PuzzleSession::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jigsaw_core::{GridCell, PieceId};
    use serde_json::json;

    fn session() -> PlayerSession {
        PlayerSession::with_seed(PuzzleConfig::default(), 17)
    }

    #[test]
    fn test_actions_need_a_puzzle() {
        let mut session = session();
        assert!(!session.has_puzzle());
        assert!(matches!(
            session.apply_action(json!("Release")),
            Err(SessionError::NoPuzzle)
        ));
    }

    #[test]
    fn test_start_puzzle_grid_selection() {
        let mut session = session();

        let state = session.start_puzzle(None, None, None).unwrap();
        assert_eq!((state.board.rows, state.board.columns), (6, 8));

        let state = session.start_puzzle(Some(Difficulty::Easy), None, None).unwrap();
        assert_eq!((state.board.rows, state.board.columns), (3, 4));

        let state = session
            .start_puzzle(Some(Difficulty::Easy), Some(5), None)
            .unwrap();
        assert_eq!((state.board.rows, state.board.columns), (5, 4));
        assert_eq!(state.pieces.len(), 20);
    }

    #[test]
    fn test_bad_grid_keeps_previous_puzzle() {
        let mut session = session();
        session.start_puzzle(Some(Difficulty::Easy), None, None).unwrap();
        assert!(matches!(
            session.start_puzzle(None, Some(1), Some(1)),
            Err(SessionError::Puzzle(PuzzleError::Config(_)))
        ));
        assert_eq!(session.snapshot().unwrap().pieces.len(), 12);
    }

    #[test]
    fn test_apply_json_actions() {
        let mut session = session();
        session.start_puzzle(Some(Difficulty::Easy), None, None).unwrap();

        let events = session.apply_action(json!({ "Pick": 0 })).unwrap();
        assert!(matches!(
            events.as_slice(),
            [PuzzleEvent::PiecePicked { piece: PieceId(0), .. }]
        ));

        // Top-left piece straight onto the top-left corner
        while session.snapshot().unwrap().pieces[0].rotation.degrees() != 0 {
            session.apply_action(json!("Rotate")).unwrap();
        }
        let center = session.snapshot().unwrap().board.cell_center(GridCell::new(0, 0));
        session
            .apply_action(json!({ "MoveTo": { "x": center.x, "y": center.y } }))
            .unwrap();
        let events = session.apply_action(json!("Release")).unwrap();
        assert!(matches!(
            events.as_slice(),
            [PuzzleEvent::PiecePlaced { piece: PieceId(0), .. }]
        ));
    }

    #[test]
    fn test_malformed_and_refused_actions() {
        let mut session = session();
        session.start_puzzle(None, None, None).unwrap();

        assert!(matches!(
            session.apply_action(json!({ "Teleport": 1 })),
            Err(SessionError::InvalidAction(_))
        ));
        assert!(matches!(
            session.apply_action(json!({ "Pick": 500 })),
            Err(SessionError::Puzzle(PuzzleError::UnknownPiece(PieceId(500))))
        ));
    }
}
