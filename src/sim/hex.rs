//! Hex-grid cells and adjacency
//!
//! On a staggered layout the six neighbours of a cell depend on the parity of
//! its row. There is exactly one offset table per parity; neighbour lookup and
//! placement fallback both read it.

use serde::{Deserialize, Serialize};

use super::state::{Bubble, Grid};

/// Discrete (row, col) grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_even_row(&self) -> bool {
        self.row.rem_euclid(2) == 0
    }

    /// The six adjacent cells in table order (may lie outside the grid)
    pub fn neighbors(&self) -> [GridCell; 6] {
        let table = neighbor_offsets(self.row);
        table.map(|(dr, dc)| GridCell::new(self.row.saturating_add(dr), self.col.saturating_add(dc)))
    }
}

/// (row, col) offsets for even rows: up-left, up-right, left, right, down-left, down-right
pub const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)];
/// Same order for odd rows, which sit half a bubble to the right
pub const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

/// Offset table for a row
#[inline]
pub fn neighbor_offsets(row: i32) -> &'static [(i32, i32); 6] {
    if row.rem_euclid(2) == 0 {
        &EVEN_ROW_OFFSETS
    } else {
        &ODD_ROW_OFFSETS
    }
}

/// Settled bubbles adjacent to `bubble`, in table order
///
/// Empty cells are skipped; an in-flight bubble has no neighbours.
pub fn get_neighbors<'a>(grid: &'a Grid, bubble: &Bubble) -> Vec<&'a Bubble> {
    match bubble.cell() {
        Some(cell) => cell_neighbors(grid, cell).collect(),
        None => Vec::new(),
    }
}

/// Settled bubbles adjacent to `cell`
pub fn cell_neighbors(grid: &Grid, cell: GridCell) -> impl Iterator<Item = &Bubble> + '_ {
    cell.neighbors().into_iter().filter_map(move |n| grid.get(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::GridGeometry;
    use crate::sim::state::{BubbleColor, BubbleId};

    fn settled(grid: &mut Grid, g: &GridGeometry, id: u32, row: i32, col: i32) {
        let cell = GridCell::new(row, col);
        grid.insert(Bubble::settled(
            BubbleId(id),
            BubbleColor(0),
            cell,
            g.cell_center(cell),
        ))
        .unwrap();
    }

    #[test]
    fn test_neighbor_tables_by_parity() {
        let even = GridCell::new(2, 4).neighbors();
        assert!(even.contains(&GridCell::new(1, 3)));
        assert!(even.contains(&GridCell::new(1, 4)));
        assert!(!even.contains(&GridCell::new(1, 5)));

        let odd = GridCell::new(3, 4).neighbors();
        assert!(odd.contains(&GridCell::new(2, 4)));
        assert!(odd.contains(&GridCell::new(2, 5)));
        assert!(!odd.contains(&GridCell::new(2, 3)));
    }

    #[test]
    fn test_neighbors_are_geometrically_adjacent() {
        // Every table entry must be one diameter away on the canvas
        let g = GridGeometry::default();
        for cell in [GridCell::new(2, 4), GridCell::new(3, 4)] {
            let c = g.cell_center(cell);
            for n in cell.neighbors() {
                let d = (g.cell_center(n) - c).length();
                assert!(d <= g.bubble_size() * 1.2, "{cell:?} -> {n:?} at {d}");
            }
        }
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        for row in 0..4 {
            for col in 0..4 {
                let cell = GridCell::new(row, col);
                for n in cell.neighbors() {
                    assert!(n.neighbors().contains(&cell));
                }
            }
        }
    }

    #[test]
    fn test_get_neighbors_skips_empty_cells() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        settled(&mut grid, &g, 1, 0, 0);
        settled(&mut grid, &g, 2, 0, 1);
        settled(&mut grid, &g, 3, 1, 0);
        settled(&mut grid, &g, 4, 5, 5);

        let origin = grid.get(GridCell::new(0, 0)).unwrap().clone();
        let ids: Vec<_> = get_neighbors(&grid, &origin).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![BubbleId(2), BubbleId(3)]);
    }

    #[test]
    fn test_neighbors_of_extreme_cell_do_not_overflow() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        settled(&mut grid, &g, 1, 0, 0);
        let far = GridCell::new(i32::MAX, i32::MAX);
        let stray = Bubble::settled(BubbleId(2), BubbleColor(0), far, Default::default());

        assert!(get_neighbors(&grid, &stray).is_empty());
        assert!(far.neighbors().iter().all(|n| n.row >= i32::MAX - 1));
    }

    #[test]
    fn test_in_flight_bubble_has_no_neighbors() {
        let mut grid = Grid::new();
        let g = GridGeometry::default();
        settled(&mut grid, &g, 1, 0, 0);
        let shot = Bubble::projectile(BubbleId(9), BubbleColor(0), g.cell_center(GridCell::new(0, 1)));
        assert!(get_neighbors(&grid, &shot).is_empty());
    }
}
