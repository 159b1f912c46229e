//! Player actions and the events they produce.
//!
//! This module defines everything a renderer can ask the engine to do and
//! every state change the engine reports back. Renderers sequence their own
//! animations and sounds from these events.

use crate::hex::{Direction, HexCoordinate};
use serde::{Deserialize, Serialize};

/// All possible actions a player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Block a cell
    PlaceObstacle(HexCoordinate),
    /// Throw away the current round and start a new one
    Reset,
}

/// Events that occur as a result of actions or elapsed time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurnEvent {
    /// An obstacle was accepted
    ObstaclePlaced { cell: HexCoordinate },

    /// The token stepped to an interior cell; input is closed for the hold
    AgentMoved {
        from: HexCoordinate,
        to: HexCoordinate,
        facing: Direction,
        will_escape: bool,
        obstacles: Vec<HexCoordinate>,
    },

    /// The token stepped onto the boundary and the round is over
    AgentEscaped {
        from: HexCoordinate,
        to: HexCoordinate,
        facing: Direction,
        will_escape: bool,
        obstacles: Vec<HexCoordinate>,
    },

    /// No escape route remains and the round is over
    AgentCaptured {
        at: HexCoordinate,
        captured: bool,
        obstacles: Vec<HexCoordinate>,
    },

    /// The animation hold elapsed; placements are accepted again
    InputReopened,

    /// A fresh round started
    RoundReset {
        agent: HexCoordinate,
        obstacles: Vec<HexCoordinate>,
    },
}

impl TurnEvent {
    /// Whether this event ends the round
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TurnEvent::AgentEscaped { .. } | TurnEvent::AgentCaptured { .. }
        )
    }
}
