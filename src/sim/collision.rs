//! Projectile contact detection
//!
//! A fast projectile can cover more than a bubble's width in one step, so a
//! check at the end position alone can pass straight through a target. The
//! path check samples the whole segment travelled during the step.

use glam::Vec2;

use super::geometry::GridGeometry;
use super::state::{Bubble, Grid};

/// Points sampled along a step, both endpoints included
pub const PATH_SAMPLES: usize = 5;

/// First settled bubble (in grid order) within contact distance of `point`
pub fn check_collision<'a>(point: Vec2, grid: &'a Grid, geometry: &GridGeometry) -> Option<&'a Bubble> {
    let reach = geometry.contact_distance();
    grid.iter().find(|b| point.distance(b.pos) < reach)
}

/// First hit walking the segment `from -> to`
pub fn check_collision_along_path<'a>(
    from: Vec2,
    to: Vec2,
    grid: &'a Grid,
    geometry: &GridGeometry,
) -> Option<&'a Bubble> {
    let last = (PATH_SAMPLES - 1) as f32;
    (0..PATH_SAMPLES)
        .map(|i| from.lerp(to, i as f32 / last))
        .find_map(|p| check_collision(p, grid, geometry))
}

/// Bounce off the side walls: flips `vel.x` and pulls the centre back inside
///
/// Returns true when a bounce happened.
pub fn bounce_off_walls(pos: &mut Vec2, vel: &mut Vec2, geometry: &GridGeometry) -> bool {
    let r = geometry.bubble_radius;
    if pos.x - r < 0.0 {
        vel.x = -vel.x;
        pos.x = r;
        true
    } else if pos.x + r > geometry.canvas_width {
        vel.x = -vel.x;
        pos.x = geometry.canvas_width - r;
        true
    } else {
        false
    }
}

/// True once the projectile's top edge reaches the grid ceiling
#[inline]
pub fn touches_ceiling(pos: Vec2, geometry: &GridGeometry) -> bool {
    pos.y - geometry.bubble_radius <= geometry.top_margin
}

/// True when the projectile has left the canvas through the bottom
#[inline]
pub fn below_canvas(pos: Vec2, geometry: &GridGeometry) -> bool {
    pos.y - geometry.bubble_radius > geometry.canvas_height
}
