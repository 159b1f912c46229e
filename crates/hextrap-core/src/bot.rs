//! Automated trapper.
//!
//! Picks cells to block on behalf of a player. Renderers use it for hints;
//! tests use it to play whole rounds.
//! - Easy: Random open cell
//! - Medium: Block the token's next step
//! - Hard: One-move lookahead over the cells that matter

use crate::board::BoardState;
use crate::hex::HexCoordinate;
use crate::path::escape_distance;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
}

impl BotDifficulty {
    /// Parse a difficulty name, falling back to Medium
    pub fn from_name(name: &str) -> Self {
        match name {
            "Easy" | "easy" => BotDifficulty::Easy,
            "Hard" | "hard" => BotDifficulty::Hard,
            _ => BotDifficulty::Medium,
        }
    }
}

/// A bot that decides where to place obstacles
pub struct Trapper {
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Trapper {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose a cell to block, or `None` when no cell is open
    pub fn choose_cell(&mut self, board: &BoardState) -> Option<HexCoordinate> {
        let open = board.open_cells();
        if open.is_empty() {
            return None;
        }

        match self.difficulty {
            BotDifficulty::Easy => self.choose_easy(&open),
            BotDifficulty::Medium => self.choose_medium(board, &open),
            BotDifficulty::Hard => self.choose_hard(board, &open),
        }
    }

    /// Easy: Just pick a random open cell
    fn choose_easy(&mut self, open: &[HexCoordinate]) -> Option<HexCoordinate> {
        open.choose(&mut self.rng).copied()
    }

    /// Medium: Stand in the token's way
    fn choose_medium(
        &mut self,
        board: &BoardState,
        open: &[HexCoordinate],
    ) -> Option<HexCoordinate> {
        match board.escape_route() {
            Some(route) if route.len() > 1 => Some(route[1]),
            // Already trapped; any cell finishes the turn
            _ => self.choose_easy(open),
        }
    }

    /// Hard: Try every cell on the route and next to the token, keep the one
    /// that leaves the longest way out. A cell that traps outright wins.
    fn choose_hard(&mut self, board: &BoardState, open: &[HexCoordinate]) -> Option<HexCoordinate> {
        let agent = board.agent().position();
        let topology = board.topology();

        let mut candidates: Vec<HexCoordinate> = board
            .escape_route()
            .map(|route| route.into_iter().skip(1).collect())
            .unwrap_or_default();
        for neighbor in topology.neighbors(&agent) {
            if !candidates.contains(&neighbor) {
                candidates.push(neighbor);
            }
        }
        candidates.retain(|c| board.check_cell(c).is_ok());

        if candidates.is_empty() {
            return self.choose_easy(open);
        }

        let mut best: Option<(HexCoordinate, usize)> = None;
        for cell in candidates {
            let mut obstacles = board.obstacles().clone();
            obstacles.insert(cell);
            let score = escape_distance(agent, &obstacles, topology).unwrap_or(usize::MAX);

            // Strictly better only, so earlier candidates win ties
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((cell, score));
            }
        }

        best.map(|(cell, _)| cell)
    }
}
