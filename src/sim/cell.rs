//! Grid cell addressing
//!
//! Cells are squares of `tile_deg` degrees anchored at a fixed origin.
//! `i` counts rows northward (latitude), `j` counts columns eastward (longitude).

use serde::{Deserialize, Serialize};

use super::geo::{LatLng, LatLngBounds};
use crate::consts::{NULL_ISLAND_LAT, NULL_ISLAND_LNG, TILE_DEG};
use crate::manhattan;

/// Integer grid coordinates of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub i: i32,
    pub j: i32,
}

impl CellId {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    pub fn offset(self, di: i32, dj: i32) -> Self {
        Self::new(self.i + di, self.j + dj)
    }

    pub fn manhattan(self, other: CellId) -> u32 {
        manhattan((self.i, self.j), (other.i, other.j))
    }

    /// True if `other` lies within `radius` Manhattan steps
    pub fn is_near(self, other: CellId, radius: u32) -> bool {
        self.manhattan(other) <= radius
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

/// Maps coordinates to cells and back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub origin: LatLng,
    pub tile_deg: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            origin: LatLng::new(NULL_ISLAND_LAT, NULL_ISLAND_LNG),
            tile_deg: TILE_DEG,
        }
    }
}

impl Grid {
    pub fn new(origin: LatLng, tile_deg: f64) -> Self {
        Self { origin, tile_deg }
    }

    /// Cell containing a coordinate (floor of the offset in tiles)
    pub fn cell_at(&self, p: LatLng) -> CellId {
        CellId::new(
            ((p.lat - self.origin.lat) / self.tile_deg).floor() as i32,
            ((p.lng - self.origin.lng) / self.tile_deg).floor() as i32,
        )
    }

    /// South-west corner of a cell
    pub fn cell_corner(&self, cell: CellId) -> LatLng {
        LatLng::new(
            self.origin.lat + f64::from(cell.i) * self.tile_deg,
            self.origin.lng + f64::from(cell.j) * self.tile_deg,
        )
    }

    /// Point at fractional position (`fi`, `fj`) in [0,1) inside a cell
    pub fn point_in_cell(&self, cell: CellId, fi: f64, fj: f64) -> LatLng {
        LatLng::new(
            self.origin.lat + (f64::from(cell.i) + fi) * self.tile_deg,
            self.origin.lng + (f64::from(cell.j) + fj) * self.tile_deg,
        )
    }

    pub fn cell_bounds(&self, cell: CellId) -> LatLngBounds {
        let sw = self.cell_corner(cell);
        LatLngBounds {
            south_west: sw,
            north_east: sw.offset(self.tile_deg, self.tile_deg),
        }
    }

    /// Every cell that intersects `bounds`
    pub fn cells_covering(&self, bounds: &LatLngBounds) -> CellRange {
        let sw = self.cell_at(bounds.south_west);
        let ne = self.cell_at(bounds.north_east);
        CellRange {
            min: sw,
            max: ne,
        }
    }
}

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub min: CellId,
    pub max: CellId,
}

impl CellRange {
    pub fn new(min: CellId, max: CellId) -> Self {
        Self { min, max }
    }

    /// Number of rows (i axis)
    pub fn rows(&self) -> u32 {
        if self.max.i < self.min.i {
            0
        } else {
            self.max.i.abs_diff(self.min.i) + 1
        }
    }

    /// Number of columns (j axis)
    pub fn cols(&self) -> u32 {
        if self.max.j < self.min.j {
            0
        } else {
            self.max.j.abs_diff(self.min.j) + 1
        }
    }

    pub fn len(&self) -> usize {
        self.rows() as usize * self.cols() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, cell: CellId) -> bool {
        cell.i >= self.min.i && cell.i <= self.max.i && cell.j >= self.min.j && cell.j <= self.max.j
    }

    /// Row-major position of a cell, counting rows from `min.i`
    pub fn index_of(&self, cell: CellId) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = (cell.i - self.min.i) as usize;
        let col = (cell.j - self.min.j) as usize;
        Some(row * self.cols() as usize + col)
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + use<> {
        let (min, max) = (self.min, self.max);
        (min.i..=max.i).flat_map(move |i| (min.j..=max.j).map(move |j| CellId::new(i, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{START_LAT, START_LNG};
    use proptest::prelude::*;

    #[test]
    fn test_cell_at_start_location() {
        let grid = Grid::default();
        let cell = grid.cell_at(LatLng::new(START_LAT, START_LNG));
        assert_eq!(cell, CellId::new(369979, -1220571));
    }

    #[test]
    fn test_cell_at_floors_negative_coordinates() {
        let grid = Grid::new(LatLng::new(0.0, 0.0), 1.0);
        assert_eq!(grid.cell_at(LatLng::new(-0.5, -0.01)), CellId::new(-1, -1));
        assert_eq!(grid.cell_at(LatLng::new(0.0, 0.99)), CellId::new(0, 0));
    }

    #[test]
    fn test_cell_bounds_contains_its_points() {
        let grid = Grid::new(LatLng::new(0.0, 0.0), 0.5);
        let cell = CellId::new(3, -2);
        let bounds = grid.cell_bounds(cell);
        assert_eq!(bounds.south_west, LatLng::new(1.5, -1.0));
        assert_eq!(bounds.north_east, LatLng::new(2.0, -0.5));
        assert_eq!(grid.cell_at(grid.point_in_cell(cell, 0.5, 0.5)), cell);
    }

    #[test]
    fn test_cells_covering() {
        let grid = Grid::new(LatLng::new(0.0, 0.0), 1.0);
        let bounds = LatLngBounds::from_corners(LatLng::new(-0.5, 0.5), LatLng::new(1.5, 2.5));
        let range = grid.cells_covering(&bounds);
        assert_eq!(range.min, CellId::new(-1, 0));
        assert_eq!(range.max, CellId::new(1, 2));
        assert_eq!(range.rows(), 3);
        assert_eq!(range.cols(), 3);
        assert_eq!(range.iter().count(), 9);
        for cell in range.iter() {
            assert!(grid.cell_bounds(cell).intersects(&bounds));
        }
    }

    #[test]
    fn test_range_index_of() {
        let range = CellRange::new(CellId::new(10, 20), CellId::new(11, 22));
        assert_eq!(range.index_of(CellId::new(10, 20)), Some(0));
        assert_eq!(range.index_of(CellId::new(10, 22)), Some(2));
        assert_eq!(range.index_of(CellId::new(11, 20)), Some(3));
        assert_eq!(range.index_of(CellId::new(12, 20)), None);
        let order: Vec<_> = range.iter().filter_map(|c| range.index_of(c)).collect();
        assert_eq!(order, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_manhattan() {
        let a = CellId::new(0, 0);
        assert_eq!(a.manhattan(CellId::new(2, -1)), 3);
        assert!(a.is_near(CellId::new(2, -1), 3));
        assert!(!a.is_near(CellId::new(2, -2), 3));
    }

    proptest! {
        #[test]
        fn near_is_translation_invariant(
            pi in -100_000i32..100_000, pj in -100_000i32..100_000,
            ci in -100_000i32..100_000, cj in -100_000i32..100_000,
            ti in -100_000i32..100_000, tj in -100_000i32..100_000,
            radius in 0u32..10,
        ) {
            let player = CellId::new(pi, pj);
            let cell = CellId::new(ci, cj);
            prop_assert_eq!(
                player.is_near(cell, radius),
                player.offset(ti, tj).is_near(cell.offset(ti, tj), radius)
            );
            prop_assert_eq!(player.manhattan(cell), cell.manhattan(player));
        }
    }
}
