//! Turn state machine.
//!
//! `TurnController` owns the round's `BoardState` and is the only way to
//! mutate it. A placement runs to completion synchronously: obstacle, route
//! search, token response. A move then opens a fixed animation hold during
//! which every placement is rejected (dropped, never queued). Time is fed in
//! by the caller through `advance`, so the engine never owns a timer.
//!
//! ```text
//! AwaitingInput --place--> Resolving --Moved--> Animating --hold elapsed--> AwaitingInput
//!                                    --Escaped--> Escaped
//!                                    --Captured--> Captured
//! any phase --reset--> AwaitingInput (fresh board)
//! ```

use crate::actions::{PlayerAction, TurnEvent};
use crate::board::{BoardState, GameError, RoundState, TurnOutcome};
use crate::config::{ConfigError, GameConfig};
use crate::hex::HexCoordinate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerPhase {
    /// Placements are accepted
    AwaitingInput,
    /// A placement is being played out (only observable mid-call)
    Resolving,
    /// The token is moving on screen; placements are rejected
    Animating {
        /// Time left before input reopens
        remaining: Duration,
    },
    /// Round over, token trapped
    Captured,
    /// Round over, token got away
    Escaped,
}

/// The sole owner and mutator of the current round
pub struct TurnController {
    config: GameConfig,
    board: BoardState,
    phase: ControllerPhase,
    rng: StdRng,
    rounds_played: u32,
}

impl TurnController {
    /// Create a controller and generate the first board.
    ///
    /// Uses `config.seed` when set, otherwise a random seed.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a controller with a caller-provided RNG
    pub fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = BoardState::generate(&config, &mut rng);
        Ok(Self {
            config,
            board,
            phase: ControllerPhase::AwaitingInput,
            rng,
            rounds_played: 0,
        })
    }

    /// Replace the generated board with a prepared one (fixed puzzles, tests).
    ///
    /// The board must share the config's topology and must not be waiting on
    /// a resolution, since only the controller can finish one.
    pub fn with_board(config: GameConfig, board: BoardState) -> Result<Self, ConfigError> {
        config.validate()?;

        let expected = config.topology();
        if *board.topology() != expected {
            return Err(ConfigError::BoardTopologyMismatch {
                board_width: board.topology().width(),
                board_height: board.topology().height(),
                width: expected.width(),
                height: expected.height(),
            });
        }

        let phase = match board.round_state() {
            RoundState::AwaitingInput => ControllerPhase::AwaitingInput,
            RoundState::Captured => ControllerPhase::Captured,
            RoundState::Escaped => ControllerPhase::Escaped,
            RoundState::Resolving => return Err(ConfigError::BoardMidTurn),
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            board,
            phase,
            rng,
            rounds_played: 0,
        })
    }

    // ==================== Queries ====================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn is_accepting_input(&self) -> bool {
        self.phase == ControllerPhase::AwaitingInput
    }

    /// Time left in the current animation hold, if one is running
    pub fn hold_remaining(&self) -> Option<Duration> {
        match self.phase {
            ControllerPhase::Animating { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Number of rounds that ended in capture or escape
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    // ==================== Inputs ====================

    /// Dispatch a player action
    pub fn apply_action(&mut self, action: PlayerAction) -> Result<Vec<TurnEvent>, GameError> {
        match action {
            PlayerAction::PlaceObstacle(cell) => self.place_obstacle(cell),
            PlayerAction::Reset => Ok(self.reset()),
        }
    }

    /// Block a cell and play out the token's response.
    ///
    /// Rejected placements change nothing and are reported as errors.
    pub fn place_obstacle(&mut self, cell: HexCoordinate) -> Result<Vec<TurnEvent>, GameError> {
        if self.phase != ControllerPhase::AwaitingInput {
            debug!(%cell, phase = ?self.phase, "placement rejected, not accepting input");
            return Err(GameError::NotAcceptingInput);
        }

        self.board.place_obstacle(cell)?;
        self.phase = ControllerPhase::Resolving;

        let outcome = self.board.resolve_turn()?;
        let obstacles = self.board.sorted_obstacles();
        let facing = self.board.agent().facing();

        let mut events = vec![TurnEvent::ObstaclePlaced { cell }];
        match outcome {
            TurnOutcome::Moved { from, to } => {
                self.phase = ControllerPhase::Animating {
                    remaining: self.config.hold_duration(),
                };
                events.push(TurnEvent::AgentMoved {
                    from,
                    to,
                    facing,
                    will_escape: false,
                    obstacles,
                });
            }
            TurnOutcome::Escaped { from, to } => {
                self.phase = ControllerPhase::Escaped;
                self.rounds_played += 1;
                events.push(TurnEvent::AgentEscaped {
                    from,
                    to,
                    facing,
                    will_escape: true,
                    obstacles,
                });
            }
            TurnOutcome::Captured { at } => {
                self.phase = ControllerPhase::Captured;
                self.rounds_played += 1;
                events.push(TurnEvent::AgentCaptured {
                    at,
                    captured: true,
                    obstacles,
                });
            }
        }

        debug!(%cell, phase = ?self.phase, "placement resolved");
        Ok(events)
    }

    /// Feed elapsed time into the animation hold.
    ///
    /// Returns `InputReopened` once the hold has fully elapsed; does nothing
    /// outside `Animating`.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TurnEvent> {
        let ControllerPhase::Animating { remaining } = self.phase else {
            return Vec::new();
        };

        let remaining = remaining.saturating_sub(elapsed);
        if !remaining.is_zero() {
            self.phase = ControllerPhase::Animating { remaining };
            return Vec::new();
        }

        self.board.reopen_input();
        self.phase = ControllerPhase::AwaitingInput;
        debug!("animation hold elapsed, input reopened");
        vec![TurnEvent::InputReopened]
    }

    /// Discard the current round, including any running hold, and start a new one
    pub fn reset(&mut self) -> Vec<TurnEvent> {
        self.board = BoardState::generate(&self.config, &mut self.rng);
        self.phase = ControllerPhase::AwaitingInput;
        debug!(obstacles = self.board.obstacles().len(), "round reset");

        vec![TurnEvent::RoundReset {
            agent: self.board.agent().position(),
            obstacles: self.board.sorted_obstacles(),
        }]
    }
}
