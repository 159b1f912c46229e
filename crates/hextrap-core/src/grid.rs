//! Rectangular hex grid topology.
//!
//! The grid is a fixed `width × height` rectangle of offset hex cells with no
//! holes. Cells on the outermost ring are boundary cells: reaching one means
//! the fleeing token has escaped.

use crate::hex::HexCoordinate;
use serde::{Deserialize, Serialize};

/// Fixed-size hex grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTopology {
    width: u32,
    height: u32,
}

impl GridTopology {
    /// Create a grid with the given dimensions
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check whether a coordinate lies on the grid
    pub fn is_in_bounds(&self, coord: &HexCoordinate) -> bool {
        coord.column >= 0
            && coord.row >= 0
            && (coord.column as i64) < self.width as i64
            && (coord.row as i64) < self.height as i64
    }

    /// Check whether a coordinate is on the outer ring.
    ///
    /// Out-of-bounds coordinates are never boundary cells.
    pub fn is_boundary(&self, coord: &HexCoordinate) -> bool {
        if !self.is_in_bounds(coord) {
            return false;
        }
        let last_column = extent(self.width) - 1;
        let last_row = extent(self.height) - 1;
        coord.column == 0 || coord.column == last_column || coord.row == 0 || coord.row == last_row
    }

    /// In-bounds neighbors, in `Direction::ALL` order
    pub fn neighbors(&self, coord: &HexCoordinate) -> Vec<HexCoordinate> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.is_in_bounds(n))
            .collect()
    }

    /// The spawn cell for the fleeing token
    pub fn center(&self) -> HexCoordinate {
        HexCoordinate::new((extent(self.width) - 1) / 2, (extent(self.height) - 1) / 2)
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = HexCoordinate> + '_ {
        (0..extent(self.height))
            .flat_map(move |row| (0..extent(self.width)).map(move |column| HexCoordinate::new(column, row)))
    }
}

/// A side length as a coordinate bound; coordinates are `i32`, so longer sides
/// are clamped to the cells they can address
fn extent(side: u32) -> i32 {
    i32::try_from(side).unwrap_or(i32::MAX)
}

impl Default for GridTopology {
    fn default() -> Self {
        Self::new(11, 11)
    }
}
