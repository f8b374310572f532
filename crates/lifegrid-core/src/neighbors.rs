//! Moore neighborhood offsets and live-neighbor counting.

use lifegrid_types::Position;

use crate::grid::Grid;

/// The eight `(dx, dy)` offsets of the Moore neighborhood.
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterate over the positions surrounding `center`.
///
/// Positions that would fall outside the `i64` coordinate range are
/// skipped, so cells on the numeric edge simply have fewer neighbors.
pub fn moore_neighborhood(center: Position) -> impl Iterator<Item = Position> {
    MOORE_OFFSETS
        .iter()
        .filter_map(move |&(dx, dy)| center.offset(dx, dy))
}

/// Count live cells in the Moore neighborhood of `center`.
///
/// Dead placeholders do not count, nor does the cell at `center` itself.
/// Always in `0..=8`.
pub fn count(grid: &Grid, center: Position) -> u8 {
    let live = moore_neighborhood(center)
        .filter(|&position| grid.is_alive(position))
        .count();
    u8::try_from(live).unwrap_or(u8::MAX)
}
