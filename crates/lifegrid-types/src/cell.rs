//! Grid positions, colors, and the stored cell value.
//!
//! A [`Cell`] is identified by its [`Position`] alone. Color and the alive
//! flag are payload: two cells at the same position are the same slot in
//! the store regardless of what else differs.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A coordinate on the unbounded grid.
///
/// `y` grows downward, matching the browser canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column.
    #[ts(type = "number")]
    pub x: i64,
    /// Row.
    #[ts(type = "number")]
    pub y: i64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Offset this position by `(dx, dy)`.
    ///
    /// Returns `None` if either coordinate would leave the `i64` range.
    pub const fn offset(self, dx: i64, dy: i64) -> Option<Self> {
        let Some(x) = self.x.checked_add(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add(dy) else {
            return None;
        };
        Some(Self { x, y })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The color a player tags their cells with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A single tracked cell.
///
/// Cells are values: the engine never mutates a cell that belongs to a
/// published generation, it copies and modifies the copy. Dead cells are
/// tracked as placeholders around live regions so the next generation can
/// detect births there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cell {
    /// Column.
    #[ts(type = "number")]
    pub x: i64,
    /// Row.
    #[ts(type = "number")]
    pub y: i64,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Whether the cell is alive in this generation.
    pub alive: bool,
}

impl Cell {
    /// Create a live cell.
    pub const fn alive(position: Position, color: Color) -> Self {
        Self::with_state(position, color, true)
    }

    /// Create a dead placeholder cell.
    pub const fn dead(position: Position, color: Color) -> Self {
        Self::with_state(position, color, false)
    }

    const fn with_state(position: Position, color: Color, alive: bool) -> Self {
        Self {
            x: position.x,
            y: position.y,
            r: color.r,
            g: color.g,
            b: color.b,
            alive,
        }
    }

    /// The storage identity of this cell.
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// The color this cell carries.
    pub const fn color(&self) -> Color {
        Color::new(self.r, self.g, self.b)
    }

    /// Return a copy of this cell with the alive flag replaced.
    #[must_use]
    pub const fn with_alive(self, alive: bool) -> Self {
        Self { alive, ..self }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x: {} y: {} alive: {}", self.x, self.y, self.alive)
    }
}
