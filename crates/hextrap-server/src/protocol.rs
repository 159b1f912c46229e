//! WebSocket protocol messages for Hextrap sessions.

use hextrap_core::{BoardSnapshot, BotDifficulty, ControllerPhase, GameConfig, HexCoordinate, TurnEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Block a cell
    PlaceObstacle { column: i32, row: i32 },

    /// Start a new round
    Reset,

    /// Request the current board
    GetState,

    /// Ask the bot where to block next
    GetHint { difficulty: BotDifficulty },

    /// Request the capture tally
    GetScore,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with the session ID and the first board
    Welcome {
        session_id: Uuid,
        config: GameConfig,
        state: BoardSnapshot,
    },

    /// Engine events, in order
    Events { events: Vec<TurnEvent> },

    /// A placement was refused; nothing changed
    Rejected {
        column: i32,
        row: i32,
        reason: String,
    },

    /// Current board and controller phase
    State {
        state: BoardSnapshot,
        phase: ControllerPhase,
    },

    /// Suggested cell, if any
    Hint { cell: Option<HexCoordinate> },

    /// Rounds finished in this session
    Score(Scoreboard),

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// In-memory tally of finished rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub captures: u32,
    pub escapes: u32,
    pub rounds: u32,
}

impl Scoreboard {
    /// Count a terminal event; other events are ignored
    pub fn record(&mut self, event: &TurnEvent) {
        match event {
            TurnEvent::AgentCaptured { .. } => {
                self.captures += 1;
                self.rounds += 1;
            }
            TurnEvent::AgentEscaped { .. } => {
                self.escapes += 1;
                self.rounds += 1;
            }
            _ => {}
        }
    }
}
