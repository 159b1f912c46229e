//! Board state for a single round.
//!
//! This module contains:
//! - The set of blocked cells and the token that flees across them
//! - Round lifecycle flags
//! - Random board generation
//! - Placement validation and turn resolution
//!
//! `BoardState` enforces the round invariants: obstacles only grow, and the
//! token never stands on an obstacle.

use crate::agent::{EvasionAgent, NextStep};
use crate::config::{EnclosurePolicy, GameConfig};
use crate::grid::GridTopology;
use crate::hex::{Direction, HexCoordinate};
use crate::path::shortest_escape_route;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Waiting for the player to block a cell
    AwaitingInput,
    /// A placement was accepted and the turn is being played out
    Resolving,
    /// The token has no way out
    Captured,
    /// The token reached the boundary
    Escaped,
}

impl RoundState {
    /// Whether the round is over
    pub fn is_finished(&self) -> bool {
        matches!(self, RoundState::Captured | RoundState::Escaped)
    }
}

/// Errors that can occur when placing obstacles or resolving turns.
///
/// None of these are fatal: a rejected call leaves the board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Cell {0} is outside the grid")]
    OutOfBounds(HexCoordinate),

    #[error("Cell {0} is already blocked")]
    CellBlocked(HexCoordinate),

    #[error("Cell {0} is occupied by the token")]
    AgentCell(HexCoordinate),

    #[error("Not accepting input right now")]
    NotAcceptingInput,

    #[error("No placement is waiting to be resolved")]
    NothingToResolve,

    #[error("Token cannot start on the boundary at {0}")]
    AgentOnBoundary(HexCoordinate),
}

/// Result of resolving one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// The token stepped to an interior cell
    Moved {
        from: HexCoordinate,
        to: HexCoordinate,
    },
    /// The token stepped onto the boundary
    Escaped {
        from: HexCoordinate,
        to: HexCoordinate,
    },
    /// The token has no route left and stays put
    Captured { at: HexCoordinate },
}

/// The complete state of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardState {
    /// Grid shape
    topology: GridTopology,
    /// Blocked cells
    obstacles: HashSet<HexCoordinate>,
    /// The fleeing token
    agent: EvasionAgent,
    /// Lifecycle of the round
    round: RoundState,
    /// An accepted placement has not been resolved yet
    pending_resolution: bool,
}

impl BoardState {
    /// Generate a fresh round: token at the center, random starting obstacles.
    ///
    /// Obstacles never land on the spawn cell or on a configured safe cell.
    /// Under `EnclosurePolicy::Reroll` the obstacles are redrawn while they
    /// leave the token without any route to the boundary.
    pub fn generate<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let topology = config.topology();
        let spawn = topology.center();

        let candidates: Vec<HexCoordinate> = topology
            .cells()
            .filter(|c| *c != spawn && !config.safe_cells.contains(c))
            .collect();
        let count = config.obstacle_count().min(candidates.len());

        let attempts = match config.enclosure_policy {
            EnclosurePolicy::Reroll => config.max_generation_attempts.max(1),
            EnclosurePolicy::Accept => 1,
        };

        let mut obstacles = HashSet::new();
        for attempt in 1..=attempts {
            obstacles = candidates.choose_multiple(rng, count).copied().collect();

            if config.enclosure_policy == EnclosurePolicy::Accept
                || shortest_escape_route(spawn, &obstacles, &topology).is_some()
            {
                break;
            }

            if attempt == attempts {
                warn!(attempts, "every generated board enclosed the spawn cell, keeping the last one");
            } else {
                debug!(attempt, "spawn cell enclosed, rerolling obstacles");
            }
        }

        Self {
            topology,
            obstacles,
            agent: EvasionAgent::new(spawn),
            round: RoundState::AwaitingInput,
            pending_resolution: false,
        }
    }

    /// Build a board from explicit parts, for fixed puzzles and tests
    pub fn from_parts(
        topology: GridTopology,
        agent_position: HexCoordinate,
        obstacles: impl IntoIterator<Item = HexCoordinate>,
    ) -> Result<Self, GameError> {
        if !topology.is_in_bounds(&agent_position) {
            return Err(GameError::OutOfBounds(agent_position));
        }
        if topology.is_boundary(&agent_position) {
            return Err(GameError::AgentOnBoundary(agent_position));
        }

        let obstacles: HashSet<HexCoordinate> = obstacles.into_iter().collect();
        if let Some(cell) = obstacles.iter().find(|c| !topology.is_in_bounds(c)) {
            return Err(GameError::OutOfBounds(*cell));
        }
        if obstacles.contains(&agent_position) {
            return Err(GameError::AgentCell(agent_position));
        }

        Ok(Self {
            topology,
            obstacles,
            agent: EvasionAgent::new(agent_position),
            round: RoundState::AwaitingInput,
            pending_resolution: false,
        })
    }

    // ==================== Query Methods ====================

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn agent(&self) -> &EvasionAgent {
        &self.agent
    }

    pub fn obstacles(&self) -> &HashSet<HexCoordinate> {
        &self.obstacles
    }

    /// Obstacles in (column, row) order
    pub fn sorted_obstacles(&self) -> Vec<HexCoordinate> {
        let mut cells: Vec<_> = self.obstacles.iter().copied().collect();
        cells.sort();
        cells
    }

    pub fn is_blocked(&self, coord: &HexCoordinate) -> bool {
        self.obstacles.contains(coord)
    }

    pub fn round_state(&self) -> RoundState {
        self.round
    }

    /// The route the token would take right now
    pub fn escape_route(&self) -> Option<Vec<HexCoordinate>> {
        shortest_escape_route(self.agent.position(), &self.obstacles, &self.topology)
    }

    /// Check whether a cell could take an obstacle, ignoring the round state
    pub fn check_cell(&self, coord: &HexCoordinate) -> Result<(), GameError> {
        if !self.topology.is_in_bounds(coord) {
            return Err(GameError::OutOfBounds(*coord));
        }
        if self.obstacles.contains(coord) {
            return Err(GameError::CellBlocked(*coord));
        }
        if *coord == self.agent.position() {
            return Err(GameError::AgentCell(*coord));
        }
        Ok(())
    }

    /// Cells that could take an obstacle, row by row
    pub fn open_cells(&self) -> Vec<HexCoordinate> {
        self.topology
            .cells()
            .filter(|c| self.check_cell(c).is_ok())
            .collect()
    }

    // ==================== Mutations ====================

    /// Block a cell.
    ///
    /// On success the round moves to `Resolving` and `resolve_turn` must be
    /// called exactly once before the next placement.
    pub fn place_obstacle(&mut self, coord: HexCoordinate) -> Result<(), GameError> {
        if self.round != RoundState::AwaitingInput {
            return Err(GameError::NotAcceptingInput);
        }
        self.check_cell(&coord)?;

        self.obstacles.insert(coord);
        self.round = RoundState::Resolving;
        self.pending_resolution = true;
        debug!(%coord, "obstacle placed");
        Ok(())
    }

    /// Play out the token's response to the last placement.
    ///
    /// After `Moved` the round stays in `Resolving` until `reopen_input`.
    pub fn resolve_turn(&mut self) -> Result<TurnOutcome, GameError> {
        if !self.pending_resolution {
            return Err(GameError::NothingToResolve);
        }
        self.pending_resolution = false;

        let from = self.agent.position();
        let outcome = match self.agent.compute_next_step(&self.topology, &self.obstacles) {
            NextStep::Captured => {
                self.round = RoundState::Captured;
                TurnOutcome::Captured { at: from }
            }
            NextStep::Step {
                next,
                will_escape: true,
            } => {
                self.agent.step_to(next);
                self.round = RoundState::Escaped;
                TurnOutcome::Escaped { from, to: next }
            }
            NextStep::Step {
                next,
                will_escape: false,
            } => {
                self.agent.step_to(next);
                TurnOutcome::Moved { from, to: next }
            }
        };

        debug!(?outcome, "turn resolved");
        Ok(outcome)
    }

    /// Accept placements again after a move has finished animating
    pub fn reopen_input(&mut self) {
        if self.round == RoundState::Resolving && !self.pending_resolution {
            self.round = RoundState::AwaitingInput;
        }
    }

    /// Convert to a JSON-friendly representation for renderers
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            width: self.topology.width(),
            height: self.topology.height(),
            agent: self.agent.position(),
            facing: self.agent.facing(),
            obstacles: self.sorted_obstacles(),
            round_state: self.round,
        }
    }
}

/// JSON-friendly board representation with a sorted obstacle list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u32,
    pub height: u32,
    pub agent: HexCoordinate,
    pub facing: Direction,
    pub obstacles: Vec<HexCoordinate>,
    pub round_state: RoundState,
}
