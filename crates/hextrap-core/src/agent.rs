//! The fleeing token.

use crate::grid::GridTopology;
use crate::hex::{Direction, HexCoordinate};
use crate::path::shortest_escape_route;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What the token will do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextStep {
    /// Move one cell along the current shortest escape route
    Step {
        next: HexCoordinate,
        /// The next cell is on the boundary
        will_escape: bool,
    },
    /// No route to the boundary remains
    Captured,
}

/// The token the player is trying to trap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvasionAgent {
    position: HexCoordinate,
    /// Direction of the last step. Only renderers care about this.
    facing: Direction,
}

impl EvasionAgent {
    /// Spawn a token at the given cell
    pub fn new(position: HexCoordinate) -> Self {
        Self {
            position,
            facing: Direction::West,
        }
    }

    pub fn position(&self) -> HexCoordinate {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Decide the next step from a fresh route search.
    ///
    /// The token only ever commits to one step; the whole route is recomputed
    /// after every obstacle placement.
    pub fn compute_next_step(
        &self,
        topology: &GridTopology,
        obstacles: &HashSet<HexCoordinate>,
    ) -> NextStep {
        match shortest_escape_route(self.position, obstacles, topology) {
            Some(route) if route.len() > 1 => {
                let next = route[1];
                NextStep::Step {
                    next,
                    will_escape: topology.is_boundary(&next),
                }
            }
            _ => NextStep::Captured,
        }
    }

    /// Move to a cell, turning to face the direction of travel
    pub fn step_to(&mut self, cell: HexCoordinate) {
        if let Some(direction) = self.position.direction_to(&cell) {
            self.facing = direction;
        }
        self.position = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_along_route() {
        let grid = GridTopology::new(5, 5);
        let agent = EvasionAgent::new(HexCoordinate::new(2, 2));

        let step = agent.compute_next_step(&grid, &HashSet::new());
        assert_eq!(
            step,
            NextStep::Step {
                next: HexCoordinate::new(3, 2),
                will_escape: false
            }
        );
    }

    #[test]
    fn test_will_escape_when_next_cell_is_boundary() {
        let grid = GridTopology::new(5, 5);
        let agent = EvasionAgent::new(HexCoordinate::new(3, 2));

        let step = agent.compute_next_step(&grid, &HashSet::new());
        assert_eq!(
            step,
            NextStep::Step {
                next: HexCoordinate::new(4, 2),
                will_escape: true
            }
        );
    }

    #[test]
    fn test_captured_when_surrounded() {
        let grid = GridTopology::new(7, 7);
        let agent = EvasionAgent::new(HexCoordinate::new(3, 3));
        let obstacles: HashSet<_> = grid.neighbors(&agent.position()).into_iter().collect();

        assert_eq!(agent.compute_next_step(&grid, &obstacles), NextStep::Captured);
    }

    #[test]
    fn test_step_updates_facing() {
        let mut agent = EvasionAgent::new(HexCoordinate::new(3, 3));
        assert_eq!(agent.facing(), Direction::West);

        agent.step_to(HexCoordinate::new(4, 3));
        assert_eq!(agent.facing(), Direction::East);
        assert_eq!(agent.position(), HexCoordinate::new(4, 3));
    }
}
