//! WebAssembly bindings for the jigsaw engine.
//!
//! This module exposes a puzzle session to JavaScript through wasm-bindgen.
//! The page owns rendering and pointer handling and forwards input here.

use wasm_bindgen::prelude::*;

use crate::actions::{PuzzleAction, PuzzleEvent};
use crate::config::{ConfigError, Difficulty, PuzzleConfig};
use crate::grid::{Point, Rect};
use crate::piece::PieceId;
use crate::session::{PuzzleError, PuzzleSession};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(err: PuzzleError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn events_json(events: &[PuzzleEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| "[]".to_string())
}

fn parse_difficulty(name: &str) -> Result<Difficulty, JsValue> {
    name.parse().map_err(|e: ConfigError| JsValue::from_str(&e.to_string()))
}

/// WASM-exposed puzzle wrapper
#[wasm_bindgen]
pub struct WasmPuzzle {
    session: PuzzleSession,
}

#[wasm_bindgen]
impl WasmPuzzle {
    /// Lay out a new puzzle in a `play_width x play_height` area
    #[wasm_bindgen(constructor)]
    pub fn new(
        rows: u32,
        columns: u32,
        piece_size: f64,
        play_width: f64,
        play_height: f64,
    ) -> Result<WasmPuzzle, JsValue> {
        let config = PuzzleConfig::new(
            rows,
            columns,
            piece_size,
            Rect::new(0.0, 0.0, play_width, play_height),
        );
        let session = PuzzleSession::new(config, &mut rand::thread_rng()).map_err(to_js_error)?;
        Ok(WasmPuzzle { session })
    }

    /// Lay out a puzzle from a difficulty preset: "Easy", "Medium" or "Hard"
    #[wasm_bindgen(js_name = fromDifficulty)]
    pub fn from_difficulty(difficulty: &str) -> Result<WasmPuzzle, JsValue> {
        let config = PuzzleConfig::from_difficulty(parse_difficulty(difficulty)?);
        let session = PuzzleSession::new(config, &mut rand::thread_rng()).map_err(to_js_error)?;
        Ok(WasmPuzzle { session })
    }

    /// Start over with a different preset, keeping the current play area
    pub fn reset(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let (rows, columns) = parse_difficulty(difficulty)?.grid();
        let config = self.session.config().clone().with_grid(rows, columns);
        self.session
            .reset(config, &mut rand::thread_rng())
            .map_err(to_js_error)
    }

    /// Pick up a piece, returns events JSON
    pub fn pick(&mut self, piece: u32) -> Result<String, JsValue> {
        let events = self.session.pick(PieceId(piece)).map_err(to_js_error)?;
        Ok(events_json(&events))
    }

    /// Centre the held piece on the pointer, returns events JSON
    #[wasm_bindgen(js_name = moveTo)]
    pub fn move_to(&mut self, x: f64, y: f64) -> String {
        events_json(&self.session.move_to(Point::new(x, y)))
    }

    /// Put the held piece down, returns events JSON
    pub fn release(&mut self) -> String {
        events_json(&self.session.release())
    }

    /// Turn the held piece, returns events JSON
    pub fn rotate(&mut self) -> String {
        events_json(&self.session.rotate())
    }

    /// Click on a piece, returns events JSON
    pub fn toggle(&mut self, piece: u32) -> Result<String, JsValue> {
        let events = self.session.toggle(PieceId(piece)).map_err(to_js_error)?;
        Ok(events_json(&events))
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: PuzzleAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;
        let events = self.session.apply_action(action).map_err(to_js_error)?;
        Ok(events_json(&events))
    }

    /// Get the whole puzzle as JSON (for rendering)
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Top-left position of a piece as [x, y]
    #[wasm_bindgen(js_name = currentPosition)]
    pub fn current_position(&self, piece: u32) -> Option<Vec<f64>> {
        self.session
            .current_position(PieceId(piece))
            .map(|p| vec![p.x, p.y])
    }

    /// Rotation of a piece in degrees
    #[wasm_bindgen(js_name = currentRotation)]
    pub fn current_rotation(&self, piece: u32) -> Option<u16> {
        self.session
            .current_rotation(PieceId(piece))
            .map(|r| r.degrees())
    }

    #[wasm_bindgen(js_name = isPlaced)]
    pub fn is_placed(&self, piece: u32) -> bool {
        self.session.is_placed(PieceId(piece))
    }

    /// Id of the held piece, if any
    #[wasm_bindgen(js_name = activePiece)]
    pub fn active_piece(&self) -> Option<u32> {
        self.session.active_piece().map(|id| id.0)
    }
}
