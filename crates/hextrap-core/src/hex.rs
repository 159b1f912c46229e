//! Hex coordinate system using "odd-r" offset coordinates (column, row).
//!
//! This module provides the foundational coordinate types for the trapping board:
//! - `HexCoordinate`: Identifies an individual hex cell
//! - `Direction`: The six neighbor directions, in the fixed order used everywhere
//!   neighbors are enumerated
//!
//! We use offset coordinates because the board is a plain rectangle and the
//! renderer lays it out row by row. Odd rows are shifted half a cell to the
//! right, so the neighbor offsets depend on the parity of the row.

use serde::{Deserialize, Serialize};

/// Direction from a hex to one of its six neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Right
    East,
    /// Up-right
    NorthEast,
    /// Up-left
    NorthWest,
    /// Left
    West,
    /// Down-left
    SouthWest,
    /// Down-right
    SouthEast,
}

impl Direction {
    /// All directions in neighbor-table order, counter-clockwise from East.
    ///
    /// Path search expands neighbors in exactly this order, so among equally
    /// short escape routes the one found through the earliest direction wins.
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// The direction pointing the other way
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::NorthEast => Direction::SouthWest,
            Direction::NorthWest => Direction::SouthEast,
            Direction::West => Direction::East,
            Direction::SouthWest => Direction::NorthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }

    /// Whether a sprite moving this way should be drawn facing left
    pub fn is_leftward(&self) -> bool {
        matches!(
            self,
            Direction::NorthWest | Direction::West | Direction::SouthWest
        )
    }
}

/// Neighbor offsets for even rows, indexed like `Direction::ALL`
const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)];

/// Neighbor offsets for odd rows, indexed like `Direction::ALL`
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (0, 1), (1, 1)];

/// Offset coordinate for a hex cell.
///
/// - `column` increases going east (right)
/// - `row` increases going south (down)
/// - odd rows sit half a cell further east than even rows
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct HexCoordinate {
    /// Column (increases going east)
    pub column: i32,
    /// Row (increases going south)
    pub row: i32,
}

impl HexCoordinate {
    /// Create a new hex coordinate
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    fn offsets(&self) -> &'static [(i32, i32); 6] {
        if self.row.rem_euclid(2) == 1 {
            &ODD_ROW_OFFSETS
        } else {
            &EVEN_ROW_OFFSETS
        }
    }

    /// The six neighboring hexes in `Direction::ALL` order.
    ///
    /// These are not bounds-checked; see `GridTopology::neighbors` for that.
    pub fn neighbors(&self) -> [HexCoordinate; 6] {
        self.offsets()
            .map(|(dc, dr)| HexCoordinate::new(self.column + dc, self.row + dr))
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: Direction) -> HexCoordinate {
        // Variants are declared in table order
        let (dc, dr) = self.offsets()[direction as usize];
        HexCoordinate::new(self.column + dc, self.row + dr)
    }

    /// The direction from this hex to an adjacent one, if they are adjacent
    pub fn direction_to(&self, other: &HexCoordinate) -> Option<Direction> {
        Direction::ALL
            .iter()
            .zip(self.neighbors())
            .find(|(_, n)| n == other)
            .map(|(d, _)| *d)
    }

    /// Convert to cube coordinates (x, y, z) with x + y + z = 0
    fn to_cube(self) -> (i32, i32, i32) {
        let x = self.column - (self.row - self.row.rem_euclid(2)) / 2;
        let z = self.row;
        (x, -x - z, z)
    }

    /// Distance to another hex (in hex steps), ignoring obstacles and bounds
    pub fn distance_to(&self, other: &HexCoordinate) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        (((ax - bx).abs() + (ay - by).abs() + (az - bz).abs()) / 2) as u32
    }

    /// Convert to pixel coordinates (center of hex).
    /// Uses pointy-top orientation with the given hex size (radius)
    pub fn to_pixel(&self, hex_size: f64) -> (f64, f64) {
        let shift = if self.row.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
        let x = hex_size * 3.0_f64.sqrt() * (self.column as f64 + shift);
        let y = hex_size * 1.5 * self.row as f64;
        (x, y)
    }
}

impl std::fmt::Display for HexCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}
