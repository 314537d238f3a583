//! Grid Geometry
//!
//! The board is an N×N grid addressed by a single linear index
//! `row * N + column`. Rows and columns only matter when validating a step:
//! a move may never leave the board or wrap from one row into the next.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Linear cell index in `[0, N²)`.
pub type Position = u32;

/// Default board edge length.
pub const DEFAULT_GRID_SIZE: u32 = 10;

/// Movement direction on the grid.
///
/// Wire codes: 0 = Up, 1 = Down, 2 = Left, 3 = Right. Up decreases the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Row - 1
    Up = 0,
    /// Row + 1
    Down = 1,
    /// Column - 1
    Left = 2,
    /// Column + 1
    Right = 3,
}

impl Direction {
    /// All directions, in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Decode a direction code. Unknown codes have no direction.
    pub fn from_code(code: u32) -> Option<Direction> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Wire code for this direction.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// (row, column) delta.
    #[inline]
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Square board of `size × size` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl Grid {
    /// Largest supported edge length (keeps `size²` well inside `u32`).
    pub const MAX_SIZE: u32 = 4096;

    /// Create a grid. Callers validate `size` through the session config.
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Edge length.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of cells (N²).
    #[inline]
    pub fn cells(&self) -> u32 {
        self.size * self.size
    }

    /// Is this index on the board?
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position < self.cells()
    }

    /// Split an index into (row, column).
    #[inline]
    pub fn row_col(&self, position: Position) -> (u32, u32) {
        (position / self.size, position % self.size)
    }

    /// Join (row, column) into an index, if on the board.
    pub fn index(&self, row: u32, column: u32) -> Option<Position> {
        if row < self.size && column < self.size {
            Some(row * self.size + column)
        } else {
            None
        }
    }

    /// Cell one step away in `direction`, or `None` when the step leaves the board.
    pub fn step(&self, position: Position, direction: Direction) -> Option<Position> {
        if !self.contains(position) {
            return None;
        }
        let (row, column) = self.row_col(position);
        let (dr, dc) = direction.delta();
        let row = row as i64 + dr;
        let column = column as i64 + dc;
        let edge = self.size as i64;

        if row < 0 || row >= edge || column < 0 || column >= edge {
            return None;
        }
        self.index(row as u32, column as u32)
    }

    /// In-bounds orthogonal neighbours, ordered up, down, left, right.
    pub fn neighbors(&self, position: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.step(position, dir))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
