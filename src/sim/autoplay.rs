//! Seeded aiming bot for headless runs and replays

use std::f32::consts::{FRAC_PI_2, PI};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::hex::GridCell;
use super::placement::is_valid_grid_position;
use super::state::{BubbleColor, GameState};
use crate::{aim_angle, clamp_aim};

/// Picks shot angles for the loaded bubble
///
/// Has its own RNG so the engine's draw sequence is never disturbed.
#[derive(Debug, Clone)]
pub struct AutoAim {
    rng: Pcg32,
    /// Max random error added to an aimed shot, in radians
    pub jitter: f32,
}

impl AutoAim {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            jitter: 0.05,
        }
    }

    /// Angle for the next shot
    ///
    /// Aims at the lowest free cell touching a bubble of the loaded colour;
    /// with no such cell, fires somewhere in the legal cone.
    pub fn aim(&mut self, state: &GameState) -> f32 {
        let margin = state.rules.aim_margin;
        let Some(loaded) = state.current.as_ref() else {
            return -FRAC_PI_2;
        };

        match self.pick_target(state, loaded.color) {
            Some(cell) => {
                let target = state.geometry.cell_center(cell);
                let angle = aim_angle(state.geometry.shooter, target);
                let noise = if self.jitter > 0.0 {
                    self.rng.random_range(-self.jitter..=self.jitter)
                } else {
                    0.0
                };
                clamp_aim(angle + noise, margin)
            }
            None => self.rng.random_range(-PI + margin..=-margin),
        }
    }

    fn pick_target(&self, state: &GameState, color: BubbleColor) -> Option<GridCell> {
        state
            .grid
            .iter()
            .filter(|b| b.color == color)
            .filter_map(|b| b.cell())
            .flat_map(|c| c.neighbors())
            .filter(|&n| is_valid_grid_position(n, &state.grid, &state.geometry))
            .filter(|&n| {
                let center = state.geometry.cell_center(n);
                !state.geometry.breaches_fail_line(center.y)
            })
            .max_by_key(|n| (n.row, -n.col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bubble, BubbleId, Grid};

    fn lone_bubble_state(color: u8, row: i32, col: i32) -> GameState {
        let mut state = GameState::new(7);
        let cell = GridCell::new(row, col);
        let center = state.geometry.cell_center(cell);
        state.grid = Grid::from_bubbles([Bubble::settled(BubbleId(1), BubbleColor(color), cell, center)]).unwrap();
        state.current.as_mut().unwrap().color = BubbleColor(color);
        state
    }

    #[test]
    fn test_aims_below_matching_bubble() {
        let state = lone_bubble_state(2, 0, 5);
        let mut bot = AutoAim::new(1);
        bot.jitter = 0.0;

        // Lowest free neighbour of (0,5) is (1,4)
        let want = aim_angle(state.geometry.shooter, state.geometry.cell_center(GridCell::new(1, 4)));
        assert!((bot.aim(&state) - want).abs() < 1e-6);
    }

    #[test]
    fn test_random_shot_stays_in_cone() {
        let mut state = lone_bubble_state(2, 0, 5);
        state.current.as_mut().unwrap().color = BubbleColor(4);
        let margin = state.rules.aim_margin;
        let mut bot = AutoAim::new(3);
        for _ in 0..100 {
            let a = bot.aim(&state);
            assert!(a >= -PI + margin - 1e-6 && a <= -margin + 1e-6);
        }
    }

    #[test]
    fn test_same_seed_same_angles() {
        let state = GameState::new(42);
        let mut a = AutoAim::new(9);
        let mut b = AutoAim::new(9);
        for _ in 0..10 {
            assert_eq!(a.aim(&state), b.aim(&state));
        }
    }
}
