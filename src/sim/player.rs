//! Player position and movement

use serde::{Deserialize, Serialize};

use super::cell::{CellId, Grid};
use super::geo::LatLng;

/// One of the four axis-aligned steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Change in (i, j) cell indices
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

/// The player marker.
///
/// Stored as a cell plus an in-cell fraction so that each step moves the
/// cell indices by exactly one, whatever the rounding of the coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    cell: CellId,
    /// Fraction of a tile inside the cell, each in [0, 1)
    frac: (f64, f64),
}

impl Player {
    /// Place the player at a coordinate
    pub fn at(grid: &Grid, pos: LatLng) -> Self {
        let cell = grid.cell_at(pos);
        let fi = (pos.lat - grid.origin.lat) / grid.tile_deg - f64::from(cell.i);
        let fj = (pos.lng - grid.origin.lng) / grid.tile_deg - f64::from(cell.j);
        Self {
            cell,
            frac: (fi.clamp(0.0, 0.999_999), fj.clamp(0.0, 0.999_999)),
        }
    }

    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// Current coordinate
    pub fn position(&self, grid: &Grid) -> LatLng {
        grid.point_in_cell(self.cell, self.frac.0, self.frac.1)
    }

    /// Translate by one tile; returns the new cell
    pub fn step(&mut self, direction: Direction) -> CellId {
        let (di, dj) = direction.delta();
        self.cell = self.cell.offset(di, dj);
        self.cell
    }
}
