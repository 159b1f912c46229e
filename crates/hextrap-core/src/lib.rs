//! Hextrap - a hex-grid trapping puzzle engine
//!
//! The player blocks one hex cell per turn; a fleeing token answers by
//! stepping along its shortest route to the edge of the board. Block every
//! route and the token is captured; let it reach the edge and it escapes.
//!
//! # Architecture
//!
//! The engine is platform-agnostic and owns no timers or globals. It can be compiled to:
//! - Native Rust for server-hosted sessions
//! - WebAssembly for in-browser play
//!
//! # Modules
//!
//! - [`hex`]: Offset hex coordinates and neighbor tables
//! - [`grid`]: Grid bounds and boundary cells
//! - [`path`]: Breadth-first escape-route search
//! - [`agent`]: The fleeing token
//! - [`board`]: Obstacles, token and round state
//! - [`controller`]: Turn state machine and animation hold
//! - [`actions`]: Player actions and renderer events
//! - [`config`]: Round configuration
//! - [`bot`]: Automated trapper for hints and tests

pub mod actions;
pub mod agent;
pub mod board;
pub mod bot;
pub mod config;
pub mod controller;
pub mod grid;
pub mod hex;
pub mod path;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{PlayerAction, TurnEvent};
pub use agent::{EvasionAgent, NextStep};
pub use board::{BoardSnapshot, BoardState, GameError, RoundState, TurnOutcome};
pub use bot::{BotDifficulty, Trapper};
pub use config::{ConfigError, EnclosurePolicy, GameConfig};
pub use controller::{ControllerPhase, TurnController};
pub use grid::GridTopology;
pub use hex::{Direction, HexCoordinate};
pub use path::{escape_distance, shortest_escape_route};
