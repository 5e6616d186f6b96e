//! Staggered hex-grid geometry
//!
//! Rows are laid out top to bottom, one bubble diameter apart. Odd rows are
//! shifted right by half a diameter. The same mapping is used for snapping,
//! neighbour lookup, placement and rendering, so it lives in one value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hex::GridCell;
use crate::consts::*;

/// A discrete cell together with its canonical pixel centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    pub cell: GridCell,
    pub center: Vec2,
}

/// Geometry constants, fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    pub bubble_radius: f32,
    /// X of the column-0 centre on even rows
    pub offset_x: f32,
    /// Y of the row-0 centre
    pub top_margin: f32,
    pub cols: i32,
    /// Nominal row count used for board generation
    pub rows: i32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub fail_line_y: f32,
    /// Added to two radii to get the contact distance
    pub collision_slack: f32,
    pub shooter: Vec2,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            bubble_radius: BUBBLE_RADIUS,
            offset_x: GRID_OFFSET_X,
            top_margin: GRID_TOP,
            cols: GRID_COLS,
            rows: GRID_ROWS,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            fail_line_y: FAIL_LINE_Y,
            collision_slack: COLLISION_SLACK,
            shooter: Vec2::new(SHOOTER_X, SHOOTER_Y),
        }
    }
}

impl GridGeometry {
    /// Bubble diameter (distance between neighbouring centres on a row)
    #[inline]
    pub fn bubble_size(&self) -> f32 {
        self.bubble_radius * 2.0
    }

    /// Horizontal shift applied to a row
    #[inline]
    pub fn row_offset(&self, row: i32) -> f32 {
        if row.rem_euclid(2) == 0 {
            0.0
        } else {
            self.bubble_size() / 2.0
        }
    }

    /// Canonical pixel centre of a cell
    pub fn cell_center(&self, cell: GridCell) -> Vec2 {
        let size = self.bubble_size();
        Vec2::new(
            self.offset_x + cell.col as f32 * size + self.row_offset(cell.row),
            self.top_margin + cell.row as f32 * size,
        )
    }

    /// Cell paired with its canonical centre
    pub fn position_of(&self, cell: GridCell) -> GridPosition {
        GridPosition {
            cell,
            center: self.cell_center(cell),
        }
    }

    /// Last row whose centre still lies on the canvas
    #[inline]
    pub fn max_row(&self) -> i32 {
        (((self.canvas_height - self.top_margin) / self.bubble_size()).floor() as i32).max(0)
    }

    /// `row` in `[0, max_row]` and `col` in `[0, cols)`
    #[inline]
    pub fn in_bounds(&self, cell: GridCell) -> bool {
        (0..=self.max_row()).contains(&cell.row) && cell.col >= 0 && cell.col < self.cols
    }

    /// Snap a continuous point to the nearest cell
    ///
    /// Out-of-range input degrades to the nearest boundary cell. The returned
    /// centre is the cell's canonical one, not the input point.
    pub fn snap(&self, pos: Vec2) -> GridPosition {
        let size = self.bubble_size();

        let raw_row = (pos.y - self.top_margin) / size;
        let row = ((raw_row + 0.5).floor() as i32).clamp(0, self.max_row());

        let adjusted_x = pos.x - self.offset_x - self.row_offset(row);
        let raw_col = adjusted_x / size;
        let col = ((raw_col + 0.5).floor() as i32).clamp(0, (self.cols - 1).max(0));

        self.position_of(GridCell::new(row, col))
    }

    /// Distance under which a point touches a settled bubble
    #[inline]
    pub fn contact_distance(&self) -> f32 {
        self.bubble_radius * 2.0 + self.collision_slack
    }

    /// True when a settled bubble centred at `y` has reached the fail line
    #[inline]
    pub fn breaches_fail_line(&self, y: f32) -> bool {
        y >= self.fail_line_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cell_center_even_and_odd_rows() {
        let g = GridGeometry::default();
        assert_eq!(g.cell_center(GridCell::new(0, 0)), Vec2::new(20.0, 60.0));
        assert_eq!(g.cell_center(GridCell::new(0, 3)), Vec2::new(140.0, 60.0));
        // Odd rows shift right by a radius
        assert_eq!(g.cell_center(GridCell::new(1, 0)), Vec2::new(40.0, 100.0));
    }

    #[test]
    fn test_snap_returns_canonical_center() {
        let g = GridGeometry::default();
        let p = g.snap(Vec2::new(143.0, 67.0));
        assert_eq!(p.cell, GridCell::new(0, 3));
        assert_eq!(p.center, Vec2::new(140.0, 60.0));

        // Odd row uses the shifted columns
        let p = g.snap(Vec2::new(62.0, 98.0));
        assert_eq!(p.cell, GridCell::new(1, 1));
        assert_eq!(p.center, Vec2::new(80.0, 100.0));
    }

    #[test]
    fn test_snap_clamps_out_of_range() {
        let g = GridGeometry::default();
        let p = g.snap(Vec2::new(-500.0, -500.0));
        assert_eq!(p.cell, GridCell::new(0, 0));

        let p = g.snap(Vec2::new(10_000.0, 80.0));
        assert_eq!(p.cell.col, g.cols - 1);

        let p = g.snap(Vec2::new(f32::NAN, f32::NAN));
        assert!(g.in_bounds(p.cell));
    }

    #[test]
    fn test_snap_degrades_extreme_input_to_boundary_rows() {
        let g = GridGeometry::default();
        for y in [f32::INFINITY, f32::MAX, 1e30] {
            let p = g.snap(Vec2::new(100.0, y));
            assert_eq!(p.cell.row, g.max_row());
            assert!(g.in_bounds(p.cell));
            let above = GridCell::new(p.cell.row - 1, p.cell.col);
            assert!(p.cell.neighbors().contains(&above));
        }
        for y in [f32::NEG_INFINITY, f32::MIN] {
            assert_eq!(g.snap(Vec2::new(100.0, y)).cell.row, 0);
        }
    }

    #[test]
    fn test_in_bounds() {
        let g = GridGeometry::default();
        assert!(g.in_bounds(GridCell::new(0, 0)));
        assert_eq!(g.max_row(), 13);
        assert!(g.in_bounds(GridCell::new(13, 9)));
        assert!(!g.in_bounds(GridCell::new(14, 0)));
        assert!(!g.in_bounds(GridCell::new(-1, 0)));
        assert!(!g.in_bounds(GridCell::new(0, 10)));
        assert!(!g.in_bounds(GridCell::new(0, -1)));
    }

    #[test]
    fn test_fail_line_is_inclusive() {
        let g = GridGeometry::default();
        assert!(g.breaches_fail_line(500.0));
        assert!(!g.breaches_fail_line(499.9));
    }

    proptest! {
        #[test]
        fn prop_snap_is_idempotent(x in -100.0f32..600.0, y in -100.0f32..700.0) {
            let g = GridGeometry::default();
            let first = g.snap(Vec2::new(x, y));
            let second = g.snap(first.center);
            prop_assert_eq!(first.cell, second.cell);
            prop_assert_eq!(first.center, second.center);
        }

        #[test]
        fn prop_snap_stays_in_bounds(x in any::<f32>(), y in any::<f32>()) {
            let g = GridGeometry::default();
            let cell = g.snap(Vec2::new(x, y)).cell;
            prop_assert!(g.in_bounds(cell));
            for n in cell.neighbors() {
                prop_assert!((n.row - cell.row).abs() <= 1);
            }
        }
    }
}
