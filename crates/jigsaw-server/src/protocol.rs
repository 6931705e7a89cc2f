//! WebSocket protocol messages for the jigsaw server.

use jigsaw_core::{Difficulty, PuzzleEvent, PuzzleSnapshot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start (or restart) the puzzle. Rows and columns override the preset.
    NewPuzzle {
        #[serde(default)]
        difficulty: Option<Difficulty>,
        #[serde(default)]
        rows: Option<u32>,
        #[serde(default)]
        columns: Option<u32>,
    },

    /// Submit a puzzle action (pick, move, release, rotate, toggle)
    Action { action: serde_json::Value },

    /// Request the full puzzle state
    GetState,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with the connection's session ID
    Welcome { session_id: Uuid },

    /// A fresh puzzle was laid out
    PuzzleCreated { state: PuzzleSnapshot },

    /// Outcome of an action
    ActionResult {
        success: bool,
        events: Vec<PuzzleEvent>,
        error: Option<String>,
    },

    /// Full puzzle state
    PuzzleState { state: PuzzleSnapshot },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_shapes() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"NewPuzzle","payload":{"difficulty":"Hard"}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ClientMessage::NewPuzzle {
                difficulty: Some(Difficulty::Hard),
                rows: None,
                columns: None
            }
        ));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"Action","payload":{"action":{"Pick":3}}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Action { .. }));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_is_tagged() {
        let text = serde_json::to_string(&ServerMessage::Pong).unwrap();
        assert_eq!(text, r#"{"type":"Pong"}"#);
    }
}
