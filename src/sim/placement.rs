//! Landing cell resolution
//!
//! Projectile motion and grid snapping are separate approximations, so the
//! snapped cell can already be taken. The resolver then tries the six
//! neighbours of that cell before giving up.

use super::geometry::{GridGeometry, GridPosition};
use super::hex::GridCell;
use super::state::Grid;

/// In bounds and unoccupied
#[inline]
pub fn is_valid_grid_position(cell: GridCell, grid: &Grid, geometry: &GridGeometry) -> bool {
    geometry.in_bounds(cell) && !grid.is_occupied(cell)
}

/// `initial` if free, else the first free neighbour in table order
///
/// `None` means the projectile has nowhere to go and must be discarded.
pub fn find_nearest_valid_position(
    initial: GridCell,
    grid: &Grid,
    geometry: &GridGeometry,
) -> Option<GridPosition> {
    if is_valid_grid_position(initial, grid, geometry) {
        return Some(geometry.position_of(initial));
    }
    initial
        .neighbors()
        .into_iter()
        .find(|&cell| is_valid_grid_position(cell, grid, geometry))
        .map(|cell| geometry.position_of(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bubble, BubbleColor, BubbleId};

    fn fill(grid: &mut Grid, g: &GridGeometry, cells: &[(i32, i32)]) {
        for &(row, col) in cells {
            let cell = GridCell::new(row, col);
            let id = BubbleId(grid.len() as u32 + 1);
            grid.insert(Bubble::settled(id, BubbleColor(0), cell, g.cell_center(cell)))
                .unwrap();
        }
    }

    #[test]
    fn test_free_cell_is_returned_as_is() {
        let g = GridGeometry::default();
        let grid = Grid::new();
        let p = find_nearest_valid_position(GridCell::new(2, 3), &grid, &g).unwrap();
        assert_eq!(p.cell, GridCell::new(2, 3));
        assert_eq!(p.center, g.cell_center(GridCell::new(2, 3)));
    }

    #[test]
    fn test_occupied_cell_falls_back_in_table_order() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        // Even row 2: up-left (1,2) and up-right (1,3) are taken
        fill(&mut grid, &g, &[(2, 3), (1, 2), (1, 3)]);
        let p = find_nearest_valid_position(GridCell::new(2, 3), &grid, &g).unwrap();
        assert_eq!(p.cell, GridCell::new(2, 2));
    }

    #[test]
    fn test_out_of_bounds_neighbors_are_skipped() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        // Row 0, col 0: up-left/up-right are off-grid, left is off-grid
        fill(&mut grid, &g, &[(0, 0)]);
        let p = find_nearest_valid_position(GridCell::new(0, 0), &grid, &g).unwrap();
        assert_eq!(p.cell, GridCell::new(0, 1));
    }

    #[test]
    fn test_surrounded_cell_has_no_placement() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        fill(&mut grid, &g, &[(0, 0), (0, 1), (1, 0)]);
        // (0,0) even row: in-bounds neighbours are (0,1) and (1,0), both taken
        assert!(find_nearest_valid_position(GridCell::new(0, 0), &grid, &g).is_none());
    }

    #[test]
    fn test_right_edge_of_odd_row() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        // Odd row 1, last column: (0,9) (0,10 off) (1,8) (1,10 off) (2,9) (2,10 off)
        fill(&mut grid, &g, &[(1, 9), (0, 9), (1, 8)]);
        let p = find_nearest_valid_position(GridCell::new(1, 9), &grid, &g).unwrap();
        assert_eq!(p.cell, GridCell::new(2, 9));
    }
}
