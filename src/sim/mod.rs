//! Deterministic puzzle engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (grid insertion order)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod board;
pub mod collision;
pub mod connectivity;
pub mod geometry;
pub mod hex;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod state;
pub mod tick;

pub use autoplay::AutoAim;
pub use board::{generate_initial_board, spawn_projectile};
pub use collision::{check_collision, check_collision_along_path};
pub use connectivity::{find_connected_bubbles, find_floating_bubbles};
pub use geometry::{GridGeometry, GridPosition};
pub use hex::{GridCell, get_neighbors};
pub use placement::{find_nearest_valid_position, is_valid_grid_position};
pub use rng::SeededRandom;
pub use scoring::{calculate_score, is_match};
pub use state::{
    Bubble, BubbleColor, BubbleId, BubbleState, GameEvent, GamePhase, GameState, GameStats, Grid,
    GridError, Outcome,
};
pub use tick::{TickInput, tick};
