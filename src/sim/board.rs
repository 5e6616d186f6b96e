//! Board dealing and projectile spawning

use super::geometry::GridGeometry;
use super::hex::GridCell;
use super::rng::SeededRandom;
use super::state::{Bubble, BubbleColor, BubbleId};

/// Fill the top `rows` x `cols` cells with random colours
///
/// Cells are dealt row-major and get ids `1..=rows*cols` in that order, so the
/// same seed always yields the same board. Rows below are left empty.
pub fn generate_initial_board(
    rng: &mut SeededRandom,
    color_count: usize,
    rows: i32,
    cols: i32,
    geometry: &GridGeometry,
) -> Vec<Bubble> {
    let mut board = Vec::with_capacity((rows.max(0) * cols.max(0)) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let cell = GridCell::new(row, col);
            let color = draw_color(rng, color_count);
            let id = BubbleId(board.len() as u32 + 1);
            board.push(Bubble::settled(id, color, cell, geometry.cell_center(cell)));
        }
    }
    board
}

/// A random-coloured projectile waiting at the cannon
pub fn spawn_projectile(
    rng: &mut SeededRandom,
    color_count: usize,
    id: BubbleId,
    geometry: &GridGeometry,
) -> Bubble {
    let color = draw_color(rng, color_count);
    Bubble::projectile(id, color, geometry.shooter)
}

#[inline]
fn draw_color(rng: &mut SeededRandom, color_count: usize) -> BubbleColor {
    BubbleColor(rng.next_index(color_count) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_board_layout() {
        let g = GridGeometry::default();
        let mut rng = SeededRandom::new(42);
        let board = generate_initial_board(&mut rng, 5, 9, 10, &g);
        assert_eq!(board.len(), 90);

        let cells: HashSet<_> = board.iter().filter_map(|b| b.cell()).collect();
        assert_eq!(cells.len(), 90);
        assert!(board.iter().all(|b| b.color.0 < 5));
        assert!(board.iter().all(|b| b.pos == g.cell_center(b.cell().unwrap())));
        assert_eq!(board.iter().map(|b| b.cell().unwrap().row).max(), Some(8));
    }

    #[test]
    fn test_board_is_reproducible() {
        let g = GridGeometry::default();
        let a = generate_initial_board(&mut SeededRandom::new(777), 4, 6, 10, &g);
        let b = generate_initial_board(&mut SeededRandom::new(777), 4, 6, 10, &g);
        assert_eq!(a, b);

        let c = generate_initial_board(&mut SeededRandom::new(778), 4, 6, 10, &g);
        assert_ne!(a, c);
    }

    #[test]
    fn test_projectile_spawns_at_cannon() {
        let g = GridGeometry::default();
        let mut rng = SeededRandom::new(3);
        let shot = spawn_projectile(&mut rng, 3, BubbleId(99), &g);
        assert_eq!(shot.pos, g.shooter);
        assert!(!shot.is_settled());
        assert!(shot.color.0 < 3);
    }
}
