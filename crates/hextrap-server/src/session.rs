//! Single-player game sessions.
//!
//! Each WebSocket connection owns exactly one `GameSession`. The session turns
//! client messages into engine calls and engine events into server messages;
//! it never touches sockets or timers, so it can be tested directly.

use hextrap_core::{ConfigError, GameConfig, HexCoordinate, Trapper, TurnController, TurnEvent};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::protocol::{ClientMessage, Scoreboard, ServerMessage};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid game config: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed message: {0}")]
    Malformed(String),
}

/// One player's game
pub struct GameSession {
    pub id: Uuid,
    controller: TurnController,
    score: Scoreboard,
}

impl GameSession {
    pub fn new(id: Uuid, config: GameConfig) -> Result<Self, SessionError> {
        Ok(Self {
            id,
            controller: TurnController::new(config)?,
            score: Scoreboard::default(),
        })
    }

    pub fn score(&self) -> Scoreboard {
        self.score
    }

    /// Time left before the current animation hold ends
    pub fn hold_remaining(&self) -> Option<Duration> {
        self.controller.hold_remaining()
    }

    pub fn welcome(&self) -> ServerMessage {
        ServerMessage::Welcome {
            session_id: self.id,
            config: self.controller.config().clone(),
            state: self.controller.board().snapshot(),
        }
    }

    /// Parse and handle a raw text frame
    pub fn handle_text(&mut self, text: &str) -> Result<Vec<ServerMessage>, SessionError> {
        let msg: ClientMessage =
            serde_json::from_str(text).map_err(|e| SessionError::Malformed(e.to_string()))?;
        Ok(self.handle_message(msg))
    }

    /// Handle a client message, returning the replies in order
    pub fn handle_message(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        match msg {
            ClientMessage::PlaceObstacle { column, row } => {
                match self.controller.place_obstacle(HexCoordinate::new(column, row)) {
                    Ok(events) => vec![self.publish(events)],
                    Err(e) => vec![ServerMessage::Rejected {
                        column,
                        row,
                        reason: e.to_string(),
                    }],
                }
            }

            ClientMessage::Reset => {
                let events = self.controller.reset();
                vec![self.publish(events)]
            }

            ClientMessage::GetState => vec![ServerMessage::State {
                state: self.controller.board().snapshot(),
                phase: self.controller.phase(),
            }],

            ClientMessage::GetHint { difficulty } => {
                let cell = if self.controller.is_accepting_input() {
                    Trapper::new(difficulty).choose_cell(self.controller.board())
                } else {
                    None
                };
                vec![ServerMessage::Hint { cell }]
            }

            ClientMessage::GetScore => vec![ServerMessage::Score(self.score)],

            ClientMessage::Ping => vec![ServerMessage::Pong],
        }
    }

    /// Close out the animation hold after its timer fired
    pub fn finish_hold(&mut self) -> Option<ServerMessage> {
        let remaining = self.controller.hold_remaining()?;
        let events = self.controller.advance(remaining);
        if events.is_empty() {
            None
        } else {
            Some(self.publish(events))
        }
    }

    fn publish(&mut self, events: Vec<TurnEvent>) -> ServerMessage {
        for event in &events {
            self.score.record(event);
        }
        ServerMessage::Events { events }
    }
}
