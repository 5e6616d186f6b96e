//! Colour matching and anchor connectivity
//!
//! Both searches are plain breadth-first walks over hex adjacency, recomputed
//! from scratch on every call.

use std::collections::{HashSet, VecDeque};

use super::hex::{GridCell, cell_neighbors};
use super::state::{Bubble, BubbleColor, Grid};

/// Connected component of `target` colour containing `start`
///
/// Nodes of another colour are visited but never expanded, so the flood stops
/// at colour boundaries. `start` is included when it has the target colour.
pub fn find_connected_bubbles<'a>(
    grid: &'a Grid,
    start: &'a Bubble,
    target: BubbleColor,
) -> Vec<&'a Bubble> {
    let Some(start_cell) = start.cell() else {
        return Vec::new();
    };

    let mut connected = Vec::new();
    let mut visited: HashSet<GridCell> = HashSet::new();
    let mut queue: VecDeque<&Bubble> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let Some(cell) = current.cell() else { continue };
        if !visited.insert(cell) {
            continue;
        }
        if current.color != target {
            continue;
        }
        connected.push(current);

        queue.extend(cell_neighbors(grid, cell).filter(|n| {
            n.cell().is_some_and(|c| !visited.contains(&c))
        }));
    }

    log::trace!(
        "flood from ({}, {}) found {} of color {}",
        start_cell.row,
        start_cell.col,
        connected.len(),
        target.0
    );
    connected
}

/// Every bubble with no path to row 0, in grid order
///
/// Colour is ignored; only structural support counts.
pub fn find_floating_bubbles(grid: &Grid) -> Vec<&Bubble> {
    let mut anchored: HashSet<GridCell> = HashSet::new();
    let mut queue: VecDeque<GridCell> = grid
        .iter()
        .filter_map(|b| b.cell())
        .filter(|c| c.row == 0)
        .collect();

    while let Some(cell) = queue.pop_front() {
        if !anchored.insert(cell) {
            continue;
        }
        for n in cell_neighbors(grid, cell) {
            if let Some(c) = n.cell().filter(|c| !anchored.contains(c)) {
                queue.push_back(c);
            }
        }
    }

    grid.iter()
        .filter(|b| b.cell().is_some_and(|c| !anchored.contains(&c)))
        .collect()
}
