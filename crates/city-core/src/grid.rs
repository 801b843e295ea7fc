//! Grid Coordinate System
//!
//! Bijective mapping between (row, col) grid cells and world-space centers.
//! The grid is square, centered on the world origin, with a corridor of
//! fixed width between adjacent cells (and around the outer edge of each
//! cell, so every cell owns half a corridor on each side).

use city_events::Vec3;
use serde::{Deserialize, Serialize};

/// One rectangular unit of the fixed layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Unique identity within a grid of the given dimension.
    pub fn index(&self, dimension: usize) -> usize {
        self.row * dimension + self.col
    }
}

/// Fixed layout constants mapping grid cells to world space.
///
/// All three constants are fixed at construction; the mapping never changes
/// for the lifetime of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    cell_size: f64,
    corridor_width: f64,
    dimension: usize,
}

impl GridLayout {
    pub fn new(cell_size: f64, corridor_width: f64, dimension: usize) -> Self {
        Self {
            cell_size,
            corridor_width,
            dimension,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn corridor_width(&self) -> f64 {
        self.corridor_width
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Center-to-center spacing between adjacent cells.
    pub fn pitch(&self) -> f64 {
        self.cell_size + self.corridor_width
    }

    /// Overall footprint of the grid along one axis.
    pub fn total_extent(&self) -> f64 {
        self.dimension as f64 * self.pitch()
    }

    pub fn half_extent(&self) -> f64 {
        self.total_extent() * 0.5
    }

    pub fn cell_count(&self) -> usize {
        self.dimension * self.dimension
    }

    /// The cell at the center of the grid (rounds down for even dimensions).
    pub fn center_cell(&self) -> Cell {
        Cell::new(self.dimension / 2, self.dimension / 2)
    }

    /// World-space center of a cell. Columns run along +X, rows along +Z.
    pub fn cell_to_world(&self, cell: Cell) -> (f64, f64) {
        let pitch = self.pitch();
        let half = self.half_extent();
        let x = cell.col as f64 * pitch + pitch * 0.5 - half;
        let z = cell.row as f64 * pitch + pitch * 0.5 - half;
        (x, z)
    }

    /// World-space center of a cell at ground level.
    pub fn cell_center(&self, cell: Cell) -> Vec3 {
        let (x, z) = self.cell_to_world(cell);
        Vec3::new(x, 0.0, z)
    }

    /// Inverse of [`cell_to_world`]: the cell containing a world point, or
    /// `None` outside the grid footprint.
    ///
    /// [`cell_to_world`]: GridLayout::cell_to_world
    pub fn world_to_cell(&self, x: f64, z: f64) -> Option<Cell> {
        let pitch = self.pitch();
        let half = self.half_extent();
        let wx = x + half;
        let wz = z + half;
        if wx < 0.0 || wz < 0.0 {
            return None;
        }
        let col = (wx / pitch).floor() as usize;
        let row = (wz / pitch).floor() as usize;
        if row >= self.dimension || col >= self.dimension {
            return None;
        }
        Some(Cell::new(row, col))
    }

    /// Axis-aligned bounds of the cell's building footprint (the cell rect
    /// minus its half-corridor border): `((min_x, min_z), (max_x, max_z))`.
    pub fn cell_bounds(&self, cell: Cell) -> ((f64, f64), (f64, f64)) {
        let (cx, cz) = self.cell_to_world(cell);
        let half_cell = self.cell_size * 0.5;
        ((cx - half_cell, cz - half_cell), (cx + half_cell, cz + half_cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(10.0, 4.0, 5)
    }

    #[test]
    fn test_round_trip_all_cells() {
        let layout = layout();
        for row in 0..layout.dimension() {
            for col in 0..layout.dimension() {
                let cell = Cell::new(row, col);
                let (x, z) = layout.cell_to_world(cell);
                assert_eq!(
                    layout.world_to_cell(x, z),
                    Some(cell),
                    "round trip failed for ({}, {})",
                    row,
                    col
                );
            }
        }
    }

    #[test]
    fn test_world_to_cell_outside_bounds() {
        let layout = layout();
        let beyond = layout.half_extent() + 1.0;
        assert_eq!(layout.world_to_cell(beyond, 0.0), None);
        assert_eq!(layout.world_to_cell(-beyond, 0.0), None);
        assert_eq!(layout.world_to_cell(0.0, beyond), None);
        // The far edge itself is outside the half-open footprint.
        assert_eq!(layout.world_to_cell(layout.half_extent(), 0.0), None);
    }

    #[test]
    fn test_grid_is_centered() {
        let layout = layout();
        let center = layout.center_cell();
        assert_eq!(center, Cell::new(2, 2));
        let (x, z) = layout.cell_to_world(center);
        assert!(x.abs() < 1e-9 && z.abs() < 1e-9);
    }

    #[test]
    fn test_total_extent() {
        // 5 cells of 10 plus one corridor of 4 per cell.
        assert_eq!(layout().total_extent(), 70.0);
    }

    #[test]
    fn test_cell_identity_is_row_major() {
        let layout = layout();
        assert_eq!(Cell::new(0, 0).index(layout.dimension()), 0);
        assert_eq!(Cell::new(1, 0).index(layout.dimension()), 5);
        assert_eq!(Cell::new(4, 4).index(layout.dimension()), 24);
    }

    #[test]
    fn test_cell_bounds_inside_cell_rect() {
        let layout = layout();
        let cell = Cell::new(1, 3);
        let ((min_x, min_z), (max_x, max_z)) = layout.cell_bounds(cell);
        assert_eq!(max_x - min_x, layout.cell_size());
        assert_eq!(max_z - min_z, layout.cell_size());
        // The bounds center is the cell center.
        let (cx, cz) = layout.cell_to_world(cell);
        assert!(((min_x + max_x) * 0.5 - cx).abs() < 1e-9);
        assert!(((min_z + max_z) * 0.5 - cz).abs() < 1e-9);
    }
}
