//! WebSocket server and connection handling.

use crate::protocol::{Scoreboard, ServerMessage};
use crate::session::GameSession;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use hextrap_core::GameConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// Config handed to every new session
    pub game_config: GameConfig,
    /// Score of every connected session
    pub scores: DashMap<Uuid, Scoreboard>,
}

impl ServerState {
    pub fn new(game_config: GameConfig) -> Self {
        Self {
            game_config,
            scores: DashMap::new(),
        }
    }

    /// Sum of all live sessions' scores
    pub fn total_score(&self) -> Scoreboard {
        self.scores.iter().fold(Scoreboard::default(), |mut total, s| {
            total.captures += s.captures;
            total.escapes += s.escapes;
            total.rounds += s.rounds;
            total
        })
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Hextrap server listening on {}", addr);

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

    let mut session = GameSession::new(Uuid::new_v4(), state.game_config.clone())?;
    let session_id = session.id;
    state.scores.insert(session_id, session.score());

    // Send welcome message
    let msg_text = serde_json::to_string(&session.welcome())?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

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

    // Deadline of the running animation hold, if any
    let mut hold_deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match session.handle_text(&text) {
                        Ok(replies) => {
                            for reply in replies {
                                let _ = tx.send(reply);
                            }
                        }
                        Err(e) => {
                            warn!("Invalid message from {}: {}", session_id, e);
                            let _ = tx.send(ServerMessage::Error { message: e.to_string() });
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Client {} closing connection", session_id);
                        break;
                    }
                    Some(Ok(Message::Ping(_))) => {
                        let _ = tx.send(ServerMessage::Pong);
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", session_id, e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            _ = sleep_until(hold_deadline), if hold_deadline.is_some() => {
                hold_deadline = None;
                if let Some(reply) = session.finish_hold() {
                    debug!("Input reopened for {}", session_id);
                    let _ = tx.send(reply);
                }
            }
        }

        // A placement opens a hold; a reset cancels it
        hold_deadline = match (hold_deadline, session.hold_remaining()) {
            (None, Some(remaining)) => Some(Instant::now() + remaining),
            (deadline, Some(_)) => deadline,
            (_, None) => None,
        };

        state.scores.insert(session_id, session.score());
    }

    // Clean up on disconnect
    let final_score = state
        .scores
        .remove(&session_id)
        .map(|(_, score)| score)
        .unwrap_or_default();
    send_task.abort();

    info!(
        "Connection closed for {} after {} rounds ({} captures, {} escapes)",
        session_id, final_score.rounds, final_score.captures, final_score.escapes
    );
    debug!("Live sessions total: {:?}", state.total_score());
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_score_sums_sessions() {
        let state = ServerState::default();
        state.scores.insert(
            Uuid::new_v4(),
            Scoreboard {
                captures: 2,
                escapes: 1,
                rounds: 3,
            },
        );
        state.scores.insert(
            Uuid::new_v4(),
            Scoreboard {
                captures: 0,
                escapes: 4,
                rounds: 4,
            },
        );

        assert_eq!(
            state.total_score(),
            Scoreboard {
                captures: 2,
                escapes: 5,
                rounds: 7
            }
        );
    }

    #[tokio::test]
    async fn test_pending_hold_never_fires() {
        let fired = tokio::time::timeout(std::time::Duration::from_millis(20), sleep_until(None)).await;
        assert!(fired.is_err());
    }
}
