//! Fixed timestep simulation tick
//!
//! The only writer of `GameState`. Each tick advances the projectile and, on
//! contact, runs snap -> placement -> matching -> floating -> scoring in one
//! go. Removals are applied immediately; animating them is up to whoever
//! drains the events.

use super::collision::{below_canvas, bounce_off_walls, check_collision_along_path, touches_ceiling};
use super::connectivity::{find_connected_bubbles, find_floating_bubbles};
use super::hex::GridCell;
use super::placement::find_nearest_valid_position;
use super::scoring::{COMBO_MIN, calculate_score, is_match};
use super::state::{Bubble, BubbleId, GameEvent, GamePhase, GameState, Outcome};
use crate::{aim_velocity, clamp_aim};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire the loaded bubble at this angle (radians, canvas space)
    pub shoot: Option<f32>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
///
/// Events produced during the tick are appended to `events`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    // Don't tick if paused or over
    if matches!(state.phase, GamePhase::Paused | GamePhase::Finished(_)) {
        return;
    }

    if let Some(angle) = input.shoot {
        fire(state, angle, events);
    }

    advance_projectile(state, dt, events);

    // Session clock only runs once the first shot is fired
    if state.phase == GamePhase::Playing {
        state.time_remaining_ticks = state.time_remaining_ticks.saturating_sub(1);
        if state.time_remaining_ticks == 0 {
            events.push(GameEvent::TimeExpired);
            finish(state, Outcome::TimeUp);
        }
    }
}

/// Launch the loaded bubble, unless one is already flying
fn fire(state: &mut GameState, angle: f32, events: &mut Vec<GameEvent>) {
    if state.projectile.is_some() {
        return;
    }
    let Some(mut shot) = state.current.take() else {
        return;
    };

    let angle = clamp_aim(angle, state.rules.aim_margin);
    shot.pos = state.geometry.shooter;
    shot.launch(aim_velocity(angle, state.rules.launch_speed));

    state.shots_total += 1;
    if state.phase == GamePhase::Ready {
        state.phase = GamePhase::Playing;
        log::info!("Session clock started");
    }

    events.push(GameEvent::ShotFired { id: shot.id, angle });
    state.projectile = Some(shot);
}

/// Move the projectile one step and land it on contact
fn advance_projectile(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let Some(mut shot) = state.projectile.take() else {
        return;
    };
    let Some(mut vel) = shot.velocity() else {
        return;
    };

    let from = shot.pos;
    let mut pos = from + vel * dt;
    bounce_off_walls(&mut pos, &mut vel, &state.geometry);
    shot.pos = pos;
    shot.launch(vel);

    if below_canvas(pos, &state.geometry) {
        log::warn!("{} left the canvas, discarding", shot.id);
        discard(state, shot.id, events);
        return;
    }

    let contact = if touches_ceiling(pos, &state.geometry) {
        log::debug!("{} reached the ceiling at x={:.1}", shot.id, pos.x);
        // Stops flush against the ceiling, which snaps to row 0
        shot.pos.y = state.geometry.top_margin;
        true
    } else if let Some(hit) = check_collision_along_path(from, pos, &state.grid, &state.geometry) {
        log::debug!("{} hit {} at ({:.1}, {:.1})", shot.id, hit.id, pos.x, pos.y);
        true
    } else {
        false
    };

    if contact {
        land(state, shot, events);
    } else {
        state.projectile = Some(shot);
    }
}

/// Snap, place and resolve a projectile that made contact
fn land(state: &mut GameState, shot: Bubble, events: &mut Vec<GameEvent>) {
    let snapped = state.geometry.snap(shot.pos);
    let Some(target) = find_nearest_valid_position(snapped.cell, &state.grid, &state.geometry) else {
        log::warn!(
            "No free cell near ({}, {}) for {}, not placing",
            snapped.cell.row,
            snapped.cell.col,
            shot.id
        );
        discard(state, shot.id, events);
        return;
    };

    let adjusted = target.cell != snapped.cell;
    if adjusted {
        log::debug!(
            "{} moved from ({}, {}) to ({}, {})",
            shot.id,
            snapped.cell.row,
            snapped.cell.col,
            target.cell.row,
            target.cell.col
        );
    }

    let placed = shot.settle(target);
    let id = placed.id;
    if let Err(e) = state.grid.insert(placed.clone()) {
        log::warn!("Rejected landing of {}: {}", id, e);
        discard(state, id, events);
        return;
    }
    events.push(GameEvent::BubbleSettled {
        bubble: placed,
        adjusted,
    });

    let breach = state
        .grid
        .iter()
        .find(|b| state.geometry.breaches_fail_line(b.pos.y))
        .map(|b| b.id);
    if let Some(id) = breach {
        events.push(GameEvent::FailLineBreached { id });
        finish(state, Outcome::FailLine);
        return;
    }

    resolve_matches(state, target.cell, events);
    if state.is_finished() {
        return;
    }

    state.advance_queue();
}

/// Pop the landed bubble's group, drop whatever it was holding up, score
fn resolve_matches(state: &mut GameState, landed: GridCell, events: &mut Vec<GameEvent>) {
    let Some(start) = state.grid.get(landed) else {
        return;
    };
    let matched: Vec<BubbleId> = find_connected_bubbles(&state.grid, start, start.color)
        .iter()
        .map(|b| b.id)
        .collect();
    if !is_match(matched.len(), state.rules.match_threshold) {
        return;
    }

    let popped = state.grid.remove_ids(&matched);
    // Support is recomputed from scratch on the post-removal grid
    let floating: Vec<BubbleId> = find_floating_bubbles(&state.grid)
        .iter()
        .map(|b| b.id)
        .collect();
    let dropped = state.grid.remove_ids(&floating);

    let points = calculate_score(popped.len() as u32, dropped.len() as u32);
    let combo = popped.len() as u32 >= COMBO_MIN;

    state.score += points as u64;
    state.shots_hit += 1;
    state.bubbles_popped += popped.len() as u32;
    if combo {
        state.max_combo = state.max_combo.max(popped.len() as u32);
    }
    for b in &popped {
        if let Some(n) = state.popped_by_color.get_mut(b.color.0 as usize) {
            *n += 1;
        }
    }

    log::debug!(
        "Matched {} (combo: {}), dropped {}, +{} -> {}",
        popped.len(),
        combo,
        dropped.len(),
        points,
        state.score
    );

    events.push(GameEvent::MatchFound {
        bubbles: popped,
        combo,
    });
    if !dropped.is_empty() {
        events.push(GameEvent::BubblesDetached { bubbles: dropped });
    }
    events.push(GameEvent::ScoreAwarded {
        points,
        total: state.score,
    });

    if state.grid.is_empty() {
        events.push(GameEvent::BoardCleared);
        finish(state, Outcome::Cleared);
    }
}

/// Drop the projectile without touching the grid
fn discard(state: &mut GameState, id: BubbleId, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::ProjectileDiscarded { id });
    state.advance_queue();
}

fn finish(state: &mut GameState, outcome: Outcome) {
    state.phase = GamePhase::Finished(outcome);
    state.projectile = None;
    log::info!(
        "Session over: {:?}, score {}, {} shots",
        outcome,
        state.score,
        state.shots_total
    );
}
