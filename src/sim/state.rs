//! Game state and core simulation types
//!
//! All state that must survive between ticks lives here. Engine functions
//! borrow the grid per call and never keep it.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::{generate_initial_board, spawn_projectile};
use super::geometry::{GridGeometry, GridPosition};
use super::hex::GridCell;
use super::rng::SeededRandom;
use crate::consts::SIM_DT;
use crate::palette::Palette;
use crate::settings::{Rules, Settings};

/// Stable identity of a bubble for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

impl fmt::Display for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bubble-{}", self.0)
    }
}

/// Index into the active palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleColor(pub u8);

/// Flight state - a projectile has velocity, a settled bubble has a cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Queued or flying; `vel` is zero until launched
    InFlight { vel: Vec2 },
    /// Part of the static grid
    Settled { cell: GridCell },
}

/// A bubble, either a projectile or a grid occupant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub pos: Vec2,
    pub color: BubbleColor,
    pub state: BubbleState,
}

impl Bubble {
    pub fn projectile(id: BubbleId, color: BubbleColor, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            color,
            state: BubbleState::InFlight { vel: Vec2::ZERO },
        }
    }

    pub fn settled(id: BubbleId, color: BubbleColor, cell: GridCell, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            color,
            state: BubbleState::Settled { cell },
        }
    }

    /// Grid cell, if settled
    #[inline]
    pub fn cell(&self) -> Option<GridCell> {
        match self.state {
            BubbleState::Settled { cell } => Some(cell),
            BubbleState::InFlight { .. } => None,
        }
    }

    /// Velocity, if in flight
    #[inline]
    pub fn velocity(&self) -> Option<Vec2> {
        match self.state {
            BubbleState::InFlight { vel } => Some(vel),
            BubbleState::Settled { .. } => None,
        }
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(self.state, BubbleState::Settled { .. })
    }

    /// Replace this bubble with its settled form at `at`
    pub fn settle(self, at: GridPosition) -> Self {
        Self::settled(self.id, self.color, at.cell, at.center)
    }

    /// Give an in-flight bubble a velocity (no-op once settled)
    pub fn launch(&mut self, vel: Vec2) {
        if let BubbleState::InFlight { vel: v } = &mut self.state {
            *v = vel;
        }
    }
}

/// Rejected grid mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({}, {}) is already occupied by {occupant}", .cell.row, .cell.col)]
    CellOccupied { cell: GridCell, occupant: BubbleId },
    #[error("{0} is still in flight and cannot join the grid")]
    NotSettled(BubbleId),
    #[error("{0} is already on the grid")]
    DuplicateId(BubbleId),
}

/// Settled bubbles, in insertion order, indexed by cell
///
/// No two bubbles ever share a cell: `insert` refuses the second one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bubble>", into = "Vec<Bubble>")]
pub struct Grid {
    bubbles: Vec<Bubble>,
    #[serde(skip)]
    index: HashMap<GridCell, usize>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from settled bubbles, enforcing the occupancy rule
    pub fn from_bubbles(bubbles: impl IntoIterator<Item = Bubble>) -> Result<Self, GridError> {
        let mut grid = Self::new();
        for bubble in bubbles {
            grid.insert(bubble)?;
        }
        Ok(grid)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Bubbles in stable insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.iter()
    }

    pub fn as_slice(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Occupant of a cell
    #[inline]
    pub fn get(&self, cell: GridCell) -> Option<&Bubble> {
        self.index.get(&cell).map(|&i| &self.bubbles[i])
    }

    #[inline]
    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.index.contains_key(&cell)
    }

    pub fn find(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    /// Add a settled bubble
    pub fn insert(&mut self, bubble: Bubble) -> Result<(), GridError> {
        let cell = bubble.cell().ok_or(GridError::NotSettled(bubble.id))?;
        if let Some(occupant) = self.get(cell) {
            return Err(GridError::CellOccupied {
                cell,
                occupant: occupant.id,
            });
        }
        if self.find(bubble.id).is_some() {
            return Err(GridError::DuplicateId(bubble.id));
        }
        self.index.insert(cell, self.bubbles.len());
        self.bubbles.push(bubble);
        Ok(())
    }

    /// Remove every bubble whose id is listed; returns them in grid order
    pub fn remove_ids(&mut self, ids: &[BubbleId]) -> Vec<Bubble> {
        if ids.is_empty() {
            return Vec::new();
        }
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.bubbles)
            .into_iter()
            .partition(|b| ids.contains(&b.id));
        self.bubbles = kept;
        self.reindex();
        removed
    }

    fn reindexed(mut self) -> Self {
        self.reindex();
        self
    }

    fn reindex(&mut self) {
        self.index = self
            .bubbles
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.cell().map(|c| (c, i)))
            .collect();
    }
}

impl TryFrom<Vec<Bubble>> for Grid {
    type Error = GridError;

    fn try_from(bubbles: Vec<Bubble>) -> Result<Self, Self::Error> {
        Self::from_bubbles(bubbles)
    }
}

impl From<Grid> for Vec<Bubble> {
    fn from(grid: Grid) -> Self {
        grid.bubbles
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every bubble was removed
    Cleared,
    /// A settled bubble reached the fail line
    FailLine,
    /// The session clock ran out
    TimeUp,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Board dealt, clock not started until the first shot
    Ready,
    Playing,
    Paused,
    Finished(Outcome),
}

/// Notifications for the presentation layer, drained after each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { id: BubbleId, angle: f32 },
    /// A projectile joined the grid; `adjusted` when the snapped cell was taken
    BubbleSettled {
        bubble: Bubble,
        adjusted: bool,
    },
    /// No free cell near the landing point; the projectile was dropped
    ProjectileDiscarded { id: BubbleId },
    MatchFound { bubbles: Vec<Bubble>, combo: bool },
    /// Bubbles cut off from the top row, to be animated falling
    BubblesDetached { bubbles: Vec<Bubble> },
    ScoreAwarded { points: u32, total: u64 },
    FailLineBreached { id: BubbleId },
    BoardCleared,
    TimeExpired,
    Paused,
    Resumed,
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    /// Percentage of shots that produced a match
    pub accuracy: u32,
    pub max_combo: u32,
    pub time_elapsed_secs: u32,
    pub bubbles_popped: u32,
    pub popped_by_color: Vec<u32>,
    pub outcome: Option<Outcome>,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: SeededRandom,
    pub geometry: GridGeometry,
    pub rules: Rules,
    /// Palette size; colours are drawn from `0..color_count`
    pub color_count: usize,
    pub grid: Grid,
    /// Bubble loaded in the cannon
    pub current: Option<Bubble>,
    /// Preview of the following bubble
    pub next: Option<Bubble>,
    /// Bubble in flight
    pub projectile: Option<Bubble>,
    pub score: u64,
    /// Size of the largest combo match so far
    pub max_combo: u32,
    pub time_remaining_ticks: u32,
    pub phase: GamePhase,
    pub shots_total: u32,
    pub shots_hit: u32,
    pub bubbles_popped: u32,
    pub popped_by_color: Vec<u32>,
    next_id: u32,
}

impl GameState {
    /// Classic rules, default geometry and the default palette
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, &Settings::default(), Palette::default().len())
    }

    /// Deal a fresh board for `seed`
    pub fn with_settings(seed: u64, settings: &Settings, color_count: usize) -> Self {
        let geometry = settings.geometry.clone();
        let rules = settings.rules.clone();
        let mut rng = SeededRandom::new(seed);

        let rows = (geometry.rows - rules.empty_rows).max(0);
        let board = generate_initial_board(&mut rng, color_count, rows, geometry.cols, &geometry);
        let next_id = board.len() as u32 + 1;
        // Generated cells are distinct by construction
        let grid = Grid {
            index: HashMap::new(),
            bubbles: board,
        }
        .reindexed();

        let mut state = Self {
            seed,
            rng,
            time_remaining_ticks: rules.session_ticks(),
            geometry,
            rules,
            color_count,
            grid,
            current: None,
            next: None,
            projectile: None,
            score: 0,
            max_combo: 0,
            phase: GamePhase::Ready,
            shots_total: 0,
            shots_hit: 0,
            bubbles_popped: 0,
            popped_by_color: vec![0; color_count],
            next_id,
        };
        state.current = Some(state.spawn_projectile());
        state.next = Some(state.spawn_projectile());

        log::info!(
            "Session dealt: seed={} bubbles={} colors={}",
            seed,
            state.grid.len(),
            color_count
        );
        state
    }

    /// Allocate a new bubble ID
    pub fn next_bubble_id(&mut self) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Draw a random projectile waiting at the cannon
    pub fn spawn_projectile(&mut self) -> Bubble {
        let id = self.next_bubble_id();
        spawn_projectile(&mut self.rng, self.color_count, id, &self.geometry)
    }

    /// Move the preview into the cannon and draw a new preview
    pub fn advance_queue(&mut self) {
        self.current = self.next.take();
        self.next = Some(self.spawn_projectile());
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished(_))
    }

    /// Seconds left on the session clock (rounded up)
    pub fn time_remaining_secs(&self) -> u32 {
        let per_sec = (1.0 / SIM_DT).round() as u32;
        self.time_remaining_ticks.div_ceil(per_sec)
    }

    /// Summary of the run so far
    pub fn stats(&self) -> GameStats {
        let accuracy = if self.shots_total > 0 {
            (self.shots_hit as f32 / self.shots_total as f32 * 100.0).round() as u32
        } else {
            0
        };
        let elapsed = self.rules.session_secs.saturating_sub(self.time_remaining_secs());
        GameStats {
            score: self.score,
            accuracy,
            max_combo: self.max_combo,
            time_elapsed_secs: elapsed,
            bubbles_popped: self.bubbles_popped,
            popped_by_color: self.popped_by_color.clone(),
            outcome: match self.phase {
                GamePhase::Finished(o) => Some(o),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(g: &GridGeometry, id: u32, row: i32, col: i32) -> Bubble {
        let cell = GridCell::new(row, col);
        Bubble::settled(BubbleId(id), BubbleColor(0), cell, g.cell_center(cell))
    }

    #[test]
    fn test_insert_rejects_occupied_cell() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        grid.insert(at(&g, 1, 0, 0)).unwrap();
        let err = grid.insert(at(&g, 2, 0, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::CellOccupied {
                cell: GridCell::new(0, 0),
                occupant: BubbleId(1)
            }
        );
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_insert_rejects_projectile_and_duplicate_id() {
        let g = GridGeometry::default();
        let mut grid = Grid::new();
        let shot = Bubble::projectile(BubbleId(5), BubbleColor(1), Vec2::new(10.0, 10.0));
        assert_eq!(grid.insert(shot), Err(GridError::NotSettled(BubbleId(5))));

        grid.insert(at(&g, 1, 0, 0)).unwrap();
        assert_eq!(grid.insert(at(&g, 1, 0, 1)), Err(GridError::DuplicateId(BubbleId(1))));
    }

    #[test]
    fn test_remove_ids_keeps_order_and_index() {
        let g = GridGeometry::default();
        let mut grid = Grid::from_bubbles((0..5).map(|c| at(&g, c as u32 + 1, 0, c))).unwrap();
        let removed = grid.remove_ids(&[BubbleId(4), BubbleId(2)]);
        assert_eq!(
            removed.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![BubbleId(2), BubbleId(4)]
        );
        let left: Vec<_> = grid.iter().map(|b| b.id.0).collect();
        assert_eq!(left, vec![1, 3, 5]);
        assert!(grid.get(GridCell::new(0, 1)).is_none());
        assert_eq!(grid.get(GridCell::new(0, 4)).map(|b| b.id), Some(BubbleId(5)));
    }

    #[test]
    fn test_grid_serde_rebuilds_index() {
        let g = GridGeometry::default();
        let grid = Grid::from_bubbles([at(&g, 1, 0, 0), at(&g, 2, 1, 3)]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(GridCell::new(1, 3)).map(|b| b.id), Some(BubbleId(2)));

        let dup = serde_json::to_string(&vec![at(&g, 1, 0, 0), at(&g, 2, 0, 0)]).unwrap();
        assert!(serde_json::from_str::<Grid>(&dup).is_err());
    }

    #[test]
    fn test_settle_replaces_state() {
        let g = GridGeometry::default();
        let mut shot = Bubble::projectile(BubbleId(3), BubbleColor(2), Vec2::new(100.0, 300.0));
        shot.launch(Vec2::new(0.0, -10.0));
        assert_eq!(shot.velocity(), Some(Vec2::new(0.0, -10.0)));

        let placed = shot.settle(g.position_of(GridCell::new(2, 2)));
        assert_eq!(placed.cell(), Some(GridCell::new(2, 2)));
        assert_eq!(placed.pos, g.cell_center(GridCell::new(2, 2)));
        assert_eq!(placed.id, BubbleId(3));
        assert_eq!(placed.velocity(), None);
    }

    #[test]
    fn test_new_session_is_dealt() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.grid.len(), 9 * 10);
        assert!(state.current.is_some());
        assert!(state.next.is_some());
        assert!(state.projectile.is_none());
        assert_eq!(state.time_remaining_secs(), 120);
        assert_eq!(state.stats().accuracy, 0);
    }

    #[test]
    fn test_advance_queue_promotes_preview() {
        let mut state = GameState::new(1);
        let preview = state.next.clone().map(|b| b.id);
        state.advance_queue();
        assert_eq!(state.current.as_ref().map(|b| b.id), preview);
        assert_ne!(state.next.as_ref().map(|b| b.id), preview);
    }

    proptest! {
        #[test]
        fn prop_insertions_never_share_a_cell(
            cells in proptest::collection::vec((0i32..6, 0i32..10), 0..80)
        ) {
            let g = GridGeometry::default();
            let mut grid = Grid::new();
            for (i, (row, col)) in cells.into_iter().enumerate() {
                let _ = grid.insert(at(&g, i as u32 + 1, row, col));
            }
            let mut seen = std::collections::HashSet::new();
            for b in grid.iter() {
                prop_assert!(seen.insert(b.cell().unwrap()));
            }
        }
    }
}
