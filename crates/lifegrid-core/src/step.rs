//! Generation transitions.
//!
//! [`StepEngine::advance`] turns generation N into generation N+1:
//!
//! 1. An empty grid produces nothing (no transition, no save).
//! 2. Every tracked cell is evaluated against generation N only; cells
//!    are copied, never mutated, so evaluation order cannot matter.
//! 3. Cells outside the [`BoundsPolicy`] die unconditionally but stay
//!    tracked.
//! 4. Everything else follows [`classify`].
//! 5. Newborn cells get a dead frontier so the following generation can
//!    discover births around them.
//!
//! The caller installs the result as a whole; see
//! [`crate::store::CellStore::advance`].

use lifegrid_types::Cell;

use crate::bounds::BoundsPolicy;
use crate::frontier;
use crate::grid::Grid;
use crate::neighbors;

/// Which rule decided a cell's next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Live cell with fewer than two live neighbors dies.
    Underpopulation,
    /// Live cell with two or three live neighbors lives on.
    Survival,
    /// Live cell with more than three live neighbors dies.
    Overpopulation,
    /// Dead cell with exactly three live neighbors becomes alive.
    Birth,
    /// Dead cell without exactly three live neighbors stays tracked as dead.
    DeadCarryOver,
    /// Cell outside the envelope is killed regardless of neighbors.
    OutOfBounds,
}

impl Transition {
    /// Whether the cell is alive in the next generation.
    pub const fn next_alive(self) -> bool {
        matches!(self, Self::Survival | Self::Birth)
    }
}

/// Apply the standard B3/S23 rules.
///
/// Underpopulation requires the cell to be alive for both the 0 and the 1
/// neighbor case: a dead cell with one live neighbor is carried over dead,
/// never "killed".
pub const fn classify(alive: bool, adjacent: u8) -> Transition {
    match (alive, adjacent) {
        (true, 0 | 1) => Transition::Underpopulation,
        (true, 2 | 3) => Transition::Survival,
        (true, _) => Transition::Overpopulation,
        (false, 3) => Transition::Birth,
        (false, _) => Transition::DeadCarryOver,
    }
}

/// The computed successor of a generation, ready to be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextGeneration {
    /// Every tracked cell of generation N+1, frontier included.
    pub grid: Grid,
    /// Cells that were born in this transition.
    pub newborns: Vec<Cell>,
    /// Live cells of generation N that are dead in N+1.
    pub deaths: u64,
}

impl NextGeneration {
    /// Number of births.
    pub fn births(&self) -> u64 {
        u64::try_from(self.newborns.len()).unwrap_or(u64::MAX)
    }
}

/// Computes generation transitions under a fixed envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEngine {
    bounds: BoundsPolicy,
}

impl StepEngine {
    /// Create an engine enforcing `bounds`.
    pub const fn new(bounds: BoundsPolicy) -> Self {
        Self { bounds }
    }

    /// Decide which rule applies to `cell` within `current`.
    pub fn transition(&self, current: &Grid, cell: &Cell) -> Transition {
        let position = cell.position();
        if !self.bounds.contains(position) {
            return Transition::OutOfBounds;
        }
        classify(cell.alive, neighbors::count(current, position))
    }

    /// Compute the generation following `current`.
    ///
    /// Returns `None` when `current` tracks no cells.
    pub fn advance(&self, current: &Grid) -> Option<NextGeneration> {
        if current.is_empty() {
            return None;
        }

        let mut grid = Grid::with_capacity(current.len());
        let mut newborns = Vec::new();
        let mut deaths: u64 = 0;

        for cell in current.iter() {
            let transition = self.transition(current, cell);
            let next = cell.with_alive(transition.next_alive());
            if transition == Transition::Birth {
                newborns.push(next);
            }
            if cell.alive && !next.alive {
                deaths = deaths.saturating_add(1);
            }
            grid.upsert(next);
        }

        for born in &newborns {
            frontier::expand(&mut grid, born);
        }

        Some(NextGeneration {
            grid,
            newborns,
            deaths,
        })
    }
}
