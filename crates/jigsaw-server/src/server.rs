//! WebSocket server and connection handling.

use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::PlayerSession;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    pub config: ServerConfig,
    /// One puzzle session per connection
    pub sessions: DashMap<Uuid, PlayerSession>,
    /// Mapping from session ID to its outgoing message sender
    pub senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
            senders: DashMap::new(),
        }
    }

    /// Send a message to a specific connection.
    pub fn send_to(&self, session_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(msg);
        }
    }

    fn send_error(&self, session_id: Uuid, message: String) {
        self.send_to(session_id, ServerMessage::Error { message });
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Jigsaw server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let session_id = Uuid::new_v4();
    state
        .sessions
        .insert(session_id, PlayerSession::new(state.config.puzzle.clone()));

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(session_id, tx);

    let welcome = ServerMessage::Welcome { session_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(session_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {} ({})", session_id, text, e);
                    state.send_error(session_id, format!("Invalid message: {}", e));
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", session_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to(session_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    // The puzzle dies with its connection
    state.sessions.remove(&session_id);
    state.senders.remove(&session_id);
    send_task.abort();

    info!("Connection closed for {}", session_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(session_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    let Some(mut session) = state.sessions.get_mut(&session_id) else {
        warn!("Message for unknown session {}", session_id);
        return;
    };

    match msg {
        ClientMessage::NewPuzzle {
            difficulty,
            rows,
            columns,
        } => {
            let result = session.start_puzzle(difficulty, rows, columns);
            drop(session);

            match result {
                Ok(snapshot) => {
                    info!(
                        "Session {} started a {}x{} puzzle",
                        session_id, snapshot.board.rows, snapshot.board.columns
                    );
                    state.send_to(session_id, ServerMessage::PuzzleCreated { state: snapshot });
                }
                Err(e) => state.send_error(session_id, e.to_string()),
            }
        }

        ClientMessage::Action { action } => {
            let result = session.apply_action(action);
            drop(session);

            match result {
                Ok(events) => {
                    debug!("Session {} produced {} events", session_id, events.len());
                    state.send_to(
                        session_id,
                        ServerMessage::ActionResult {
                            success: true,
                            events,
                            error: None,
                        },
                    );
                }
                Err(e) => {
                    state.send_to(
                        session_id,
                        ServerMessage::ActionResult {
                            success: false,
                            events: vec![],
                            error: Some(e.to_string()),
                        },
                    );
                }
            }
        }

        ClientMessage::GetState => {
            let snapshot = session.snapshot();
            drop(session);

            match snapshot {
                Some(snapshot) => {
                    state.send_to(session_id, ServerMessage::PuzzleState { state: snapshot })
                }
                None => state.send_error(session_id, "No puzzle in progress".to_string()),
            }
        }

        ClientMessage::Ping => {
            drop(session);
            state.send_to(session_id, ServerMessage::Pong);
        }
    }
}
