//! The plain, unshared cell mapping.
//!
//! [`Grid`] is what a generation *is*: a position-keyed map of every
//! tracked cell. It has no locking of its own. The shared handle lives in
//! [`crate::store::CellStore`]; the neighbor counter, frontier expander,
//! and step engine all operate on a `Grid` borrowed for one call.
//!
//! Keying by [`Position`] makes the one-cell-per-position invariant
//! structural: inserting at an occupied position replaces the occupant.

use std::collections::HashMap;

use lifegrid_types::{Cell, Position};

/// A snapshot contained two cells at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("duplicate cell at {0}")]
pub struct DuplicatePosition(pub Position);

/// Position-keyed mapping of every tracked cell in one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: HashMap<Position, Cell>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty grid with room for `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(capacity),
        }
    }

    /// Build a grid from cells that must not share positions.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicatePosition`] for the first repeated position.
    pub fn from_unique_cells(cells: impl IntoIterator<Item = Cell>) -> Result<Self, DuplicatePosition> {
        let mut grid = Self::new();
        for cell in cells {
            if grid.upsert(cell).is_some() {
                return Err(DuplicatePosition(cell.position()));
            }
        }
        Ok(grid)
    }

    /// Insert `cell`, replacing whatever was tracked at its position.
    ///
    /// Returns the replaced cell, if any.
    pub fn upsert(&mut self, cell: Cell) -> Option<Cell> {
        self.cells.insert(cell.position(), cell)
    }

    /// The cell tracked at `position`.
    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.cells.get(&position)
    }

    /// Whether any cell, alive or dead, is tracked at `position`.
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains_key(&position)
    }

    /// Whether a live cell is tracked at `position`.
    pub fn is_alive(&self, position: Position) -> bool {
        self.cells.get(&position).is_some_and(|cell| cell.alive)
    }

    /// Number of tracked cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of live cells.
    pub fn alive_count(&self) -> usize {
        self.cells.values().filter(|cell| cell.alive).count()
    }

    /// Iterate over every tracked cell in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Copy out every tracked cell, alive and dead.
    pub fn all_tracked(&self) -> Vec<Cell> {
        self.cells.values().copied().collect()
    }

    /// Copy out the live cells only.
    pub fn alive_only(&self) -> Vec<Cell> {
        self.cells.values().filter(|cell| cell.alive).copied().collect()
    }
}

impl FromIterator<Cell> for Grid {
    /// Later cells replace earlier ones at the same position.
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut grid = Self::new();
        for cell in iter {
            grid.upsert(cell);
        }
        grid
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifegrid_types::Color;

    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    #[test]
    fn upsert_replaces_same_position() {
        let mut grid = Grid::new();
        assert!(grid.upsert(Cell::dead(Position::new(1, 1), RED)).is_none());
        let replaced = grid.upsert(Cell::alive(Position::new(1, 1), BLUE));

        assert_eq!(replaced, Some(Cell::dead(Position::new(1, 1), RED)));
        assert_eq!(grid.len(), 1);
        let cell = grid.get(Position::new(1, 1)).unwrap();
        assert!(cell.alive);
        assert_eq!(cell.color(), BLUE);
    }

    #[test]
    fn alive_only_filters_placeholders() {
        let mut grid = Grid::new();
        grid.upsert(Cell::alive(Position::new(0, 0), RED));
        grid.upsert(Cell::dead(Position::new(0, 1), RED));
        grid.upsert(Cell::dead(Position::new(1, 0), RED));

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.all_tracked().len(), 3);
        assert_eq!(grid.alive_count(), 1);
        let alive = grid.alive_only();
        assert_eq!(alive, vec![Cell::alive(Position::new(0, 0), RED)]);
        assert!(grid.is_alive(Position::new(0, 0)));
        assert!(!grid.is_alive(Position::new(0, 1)));
        assert!(!grid.is_alive(Position::new(9, 9)));
    }

    #[test]
    fn from_unique_cells_rejects_duplicates() {
        let cells = vec![
            Cell::alive(Position::new(2, 3), RED),
            Cell::dead(Position::new(4, 4), RED),
            Cell::dead(Position::new(2, 3), BLUE),
        ];
        let err = Grid::from_unique_cells(cells).unwrap_err();
        assert_eq!(err, DuplicatePosition(Position::new(2, 3)));
    }

    #[test]
    fn collect_keeps_last_cell_per_position() {
        let grid: Grid = vec![
            Cell::alive(Position::new(0, 0), RED),
            Cell::dead(Position::new(0, 0), BLUE),
        ]
        .into_iter()
        .collect();
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_alive(Position::new(0, 0)));
    }
}
