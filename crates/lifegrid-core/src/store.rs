//! The shared cell store.
//!
//! [`CellStore`] is the single owner of every tracked cell. It wraps a
//! [`Grid`] in an [`Arc`]`<`[`RwLock`]`>` and never hands the raw mapping
//! out: callers get copies. Every mutation takes the write lock, so a
//! client insertion and a generation swap are strictly ordered, and a
//! reader always sees exactly one whole generation.

use std::sync::Arc;

use lifegrid_types::{Cell, Position};
use tokio::sync::RwLock;
use tracing::info;

use crate::bounds::BoundsPolicy;
use crate::frontier;
use crate::grid::Grid;
use crate::step::StepEngine;

/// Result of a client insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The cell is alive and its frontier is tracked.
    Inserted {
        /// Placeholders created around the cell.
        frontier_created: usize,
    },
    /// The cell lies outside the envelope; nothing changed.
    Rejected,
}

/// What a completed swap installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Every tracked cell of the installed generation.
    pub cells: Vec<Cell>,
    /// Live cells in the installed generation.
    pub alive: u64,
    /// Dead cells that became alive.
    pub births: u64,
    /// Live cells that died.
    pub deaths: u64,
}

impl StepOutcome {
    /// Tracked cells in the installed generation.
    pub fn tracked(&self) -> u64 {
        u64::try_from(self.cells.len()).unwrap_or(u64::MAX)
    }
}

/// Shared, lock-guarded handle to the current generation.
///
/// Cloning the handle is cheap and all clones see the same grid.
#[derive(Debug, Clone, Default)]
pub struct CellStore {
    grid: Arc<RwLock<Grid>>,
}

impl CellStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `grid` as its current generation.
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid: Arc::new(RwLock::new(grid)),
        }
    }

    /// Insert `cell`, replacing whatever is tracked at its position.
    pub async fn upsert(&self, cell: Cell) {
        self.grid.write().await.upsert(cell);
    }

    /// The cell tracked at `position`, if any.
    pub async fn get(&self, position: Position) -> Option<Cell> {
        self.grid.read().await.get(position).copied()
    }

    /// Every tracked cell, alive and dead, in unspecified order.
    pub async fn all_tracked(&self) -> Vec<Cell> {
        self.grid.read().await.all_tracked()
    }

    /// Every live cell, in unspecified order.
    pub async fn alive_only(&self) -> Vec<Cell> {
        self.grid.read().await.alive_only()
    }

    /// Number of tracked cells.
    pub async fn len(&self) -> usize {
        self.grid.read().await.len()
    }

    /// Whether nothing is tracked.
    pub async fn is_empty(&self) -> bool {
        self.grid.read().await.is_empty()
    }

    /// Swap in `grid` as the whole current generation.
    ///
    /// Returns the generation that was replaced.
    pub async fn replace_all(&self, grid: Grid) -> Grid {
        let mut guard = self.grid.write().await;
        std::mem::replace(&mut *guard, grid)
    }

    /// Place a live cell on behalf of a client.
    ///
    /// The bounds check, the upsert, and the frontier expansion happen
    /// under one write lock, so a generation swap can never land between
    /// them.
    pub async fn insert_live(&self, cell: Cell, bounds: &BoundsPolicy) -> InsertOutcome {
        let position = cell.position();
        if !bounds.contains(position) {
            info!(%position, limit = bounds.limit(), "rejected cell outside bounds");
            return InsertOutcome::Rejected;
        }

        let cell = cell.with_alive(true);
        let mut grid = self.grid.write().await;
        grid.upsert(cell);
        let frontier_created = frontier::expand(&mut grid, &cell);
        drop(grid);

        info!(%position, frontier_created, "added cell");
        InsertOutcome::Inserted { frontier_created }
    }

    /// Replace the current generation with its successor.
    ///
    /// Generation N is read and generation N+1 installed under a single
    /// write lock: readers see either all of N or all of N+1, and no
    /// insertion can be lost between the read and the swap. Returns
    /// `None`, leaving the store untouched, when it is empty.
    pub async fn advance(&self, engine: &StepEngine) -> Option<StepOutcome> {
        let mut grid = self.grid.write().await;
        let next = engine.advance(&grid)?;
        let births = next.births();
        let deaths = next.deaths;
        *grid = next.grid;

        let cells = grid.all_tracked();
        let alive = u64::try_from(grid.alive_count()).unwrap_or(u64::MAX);
        drop(grid);

        Some(StepOutcome {
            cells,
            alive,
            births,
            deaths,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use lifegrid_types::Color;

    use super::*;

    const TEAL: Color = Color::new(0, 128, 128);
    const GOLD: Color = Color::new(255, 215, 0);

    fn live(x: i64, y: i64) -> Cell {
        Cell::alive(Position::new(x, y), TEAL)
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let store = CellStore::new();
        assert!(store.get(Position::new(0, 0)).await.is_none());

        store.upsert(live(0, 0)).await;
        store.upsert(Cell::dead(Position::new(0, 0), GOLD)).await;

        assert_eq!(store.len().await, 1);
        let cell = store.get(Position::new(0, 0)).await.unwrap();
        assert!(!cell.alive);
        assert_eq!(cell.color(), GOLD);
    }

    #[tokio::test]
    async fn insert_live_expands_frontier() {
        let store = CellStore::new();
        let outcome = store.insert_live(live(3, 4), &BoundsPolicy::default()).await;

        assert_eq!(outcome, InsertOutcome::Inserted { frontier_created: 8 });
        assert_eq!(store.len().await, 9);
        assert_eq!(store.alive_only().await, vec![live(3, 4)]);
    }

    #[tokio::test]
    async fn insert_live_forces_alive_flag() {
        let store = CellStore::new();
        let dead = Cell::dead(Position::new(1, 1), TEAL);
        store.insert_live(dead, &BoundsPolicy::default()).await;
        assert!(store.get(Position::new(1, 1)).await.unwrap().alive);
    }

    #[tokio::test]
    async fn insert_over_placeholder_revives_it() {
        let store = CellStore::new();
        let bounds = BoundsPolicy::default();
        store.insert_live(live(0, 0), &bounds).await;
        let outcome = store
            .insert_live(Cell::alive(Position::new(1, 0), GOLD), &bounds)
            .await;

        // Five of the eight neighbors of (1, 0) were already tracked.
        assert_eq!(outcome, InsertOutcome::Inserted { frontier_created: 3 });
        assert_eq!(store.alive_only().await.len(), 2);
        assert_eq!(store.len().await, 12);
    }

    #[tokio::test]
    async fn out_of_bounds_insert_is_rejected() {
        let store = CellStore::new();
        let bounds = BoundsPolicy::new(50);

        assert_eq!(store.insert_live(live(50, 0), &bounds).await, InsertOutcome::Rejected);
        assert_eq!(store.insert_live(live(0, -50), &bounds).await, InsertOutcome::Rejected);
        assert_eq!(store.insert_live(live(-51, 70), &bounds).await, InsertOutcome::Rejected);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn replace_all_swaps_whole_generation() {
        let store = CellStore::new();
        store.upsert(live(0, 0)).await;

        let next: Grid = [live(5, 5), live(6, 6)].into_iter().collect();
        let previous = store.replace_all(next).await;

        assert_eq!(previous.len(), 1);
        assert!(store.get(Position::new(0, 0)).await.is_none());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn advance_on_empty_store_changes_nothing() {
        let store = CellStore::new();
        assert!(store.advance(&StepEngine::default()).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn advance_installs_blinker_phase() {
        let store = CellStore::new();
        let bounds = BoundsPolicy::default();
        for (x, y) in [(0, 0), (1, 0), (2, 0)] {
            store.insert_live(live(x, y), &bounds).await;
        }

        let outcome = store.advance(&StepEngine::new(bounds)).await.unwrap();
        let alive: BTreeSet<(i64, i64)> =
            store.alive_only().await.iter().map(|c| (c.x, c.y)).collect();

        assert_eq!(alive, BTreeSet::from([(1, -1), (1, 0), (1, 1)]));
        assert_eq!(outcome.alive, 3);
        assert_eq!(outcome.births, 2);
        assert_eq!(outcome.deaths, 2);
        assert_eq!(outcome.tracked(), u64::try_from(store.len().await).unwrap());
    }

    #[tokio::test]
    async fn concurrent_inserts_and_steps_keep_positions_unique() {
        let store = CellStore::new();
        let bounds = BoundsPolicy::default();
        let engine = StepEngine::new(bounds);

        let mut tasks = Vec::new();
        for i in 0..16_i64 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for j in 0..8_i64 {
                    store
                        .insert_live(Cell::alive(Position::new(i % 4, j % 3), TEAL), &bounds)
                        .await;
                    if j % 4 == 0 {
                        store.advance(&engine).await;
                    }
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let cells = store.all_tracked().await;
        let distinct: BTreeSet<Position> = cells.iter().map(Cell::position).collect();
        assert_eq!(distinct.len(), cells.len());
    }
}
