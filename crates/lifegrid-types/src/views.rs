//! JSON projections served to clients.
//!
//! These are the shapes the browser client reads. They deliberately omit
//! the `alive` flag: only live cells are ever serialized for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cell::Cell;

/// A live cell as returned by `GET /api/getcells`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellView {
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
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        Self {
            x: cell.x,
            y: cell.y,
            r: cell.r,
            g: cell.g,
            b: cell.b,
        }
    }
}

/// Response body of `GET /info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridInfo {
    /// Seconds between generations.
    #[ts(type = "number")]
    pub update: u64,
    /// Number of tracked cells, alive and dead.
    #[ts(type = "number")]
    pub totalcells: u64,
}

/// Outcome of one completed generation step.
///
/// Logged by the scheduler and pushed to `WebSocket` subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepSummary {
    /// Generation number that was produced (first step yields 1).
    #[ts(type = "number")]
    pub generation: u64,
    /// Tracked cells in the new generation, after frontier expansion.
    #[ts(type = "number")]
    pub tracked: u64,
    /// Live cells in the new generation.
    #[ts(type = "number")]
    pub alive: u64,
    /// Dead cells that became alive.
    #[ts(type = "number")]
    pub births: u64,
    /// Live cells that died.
    #[ts(type = "number")]
    pub deaths: u64,
    /// Wall-clock time spent computing the step.
    #[ts(type = "number")]
    pub duration_ms: u64,
    /// When the new generation was installed.
    pub completed_at: DateTime<Utc>,
}
