//! Dead placeholder insertion around changed cells.
//!
//! The grid is unbounded but only tracked cells are ever evaluated, so a
//! birth can only be discovered at a position that is already tracked.
//! After a cell is placed or born, every untracked position around it is
//! filled with a dead placeholder carrying the cell's color. Existing
//! cells are never touched.

use lifegrid_types::Cell;

use crate::grid::Grid;
use crate::neighbors::moore_neighborhood;

/// Track every untracked Moore neighbor of `around` as a dead cell.
///
/// Returns the number of placeholders created. Calling it again with the
/// same cell creates none.
pub fn expand(grid: &mut Grid, around: &Cell) -> usize {
    let color = around.color();
    let mut created: usize = 0;
    for position in moore_neighborhood(around.position()) {
        if !grid.contains(position) {
            grid.upsert(Cell::dead(position, color));
            created = created.saturating_add(1);
        }
    }
    created
}
