//! Bubble Shooter - a match-3 bubble shooter on a staggered hex grid
//!
//! Core modules:
//! - `sim`: Deterministic puzzle engine (snapping, collisions, matching, scoring)
//! - `palette`: Theme colour palettes
//! - `settings`: Data-driven geometry, rules and presentation timing
//! - `highscores`: Local leaderboard of finished sessions
//! - `web`: wasm-bindgen surface for the hosting page (wasm32 only)

pub mod highscores;
pub mod palette;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use palette::Palette;
pub use settings::{PresentationTiming, Rules, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 450.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Grid layout
    pub const BUBBLE_RADIUS: f32 = 20.0;
    pub const GRID_COLS: i32 = 10;
    pub const GRID_ROWS: i32 = 12;
    pub const GRID_OFFSET_X: f32 = 20.0;
    pub const GRID_TOP: f32 = 60.0;
    /// Extra contact distance on top of two radii (forgiving hits)
    pub const COLLISION_SLACK: f32 = 2.0;

    /// Settled bubbles at or below this y end the run
    pub const FAIL_LINE_Y: f32 = 500.0;

    /// Cannon position
    pub const SHOOTER_X: f32 = CANVAS_WIDTH / 2.0;
    pub const SHOOTER_Y: f32 = CANVAS_HEIGHT - 50.0;

    /// Launch speed in units per second (20 units per frame)
    pub const LAUNCH_SPEED: f32 = 20.0 * 60.0;
    /// Aim is kept this far (radians) away from horizontal
    pub const AIM_MARGIN: f32 = 0.2;

    /// Session length in seconds
    pub const SESSION_SECS: u32 = 120;

    /// Identity of the rule set, bumped whenever physics or scoring change
    pub const GAME_KEY: &str = "bubble_shooter.classic";
    pub const RULES_VERSION: &str = "v1.0.0";
}

/// Clamp an aim angle into the upward cone `[-π + margin, -margin]`
///
/// Canvas y grows downward, so "up" is a negative angle.
#[inline]
pub fn clamp_aim(angle: f32, margin: f32) -> f32 {
    use std::f32::consts::PI;
    if angle.is_nan() {
        return -PI / 2.0;
    }
    angle.clamp(-PI + margin, -margin)
}

/// Velocity for a shot fired at `angle` with `speed`
#[inline]
pub fn aim_velocity(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Angle from `from` toward `to` in canvas space
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
