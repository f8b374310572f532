//! Shared type definitions for the Lifegrid simulation.
//!
//! This crate is the single source of truth for the values that cross
//! crate boundaries: the [`Cell`] stored by the engine, the wire views
//! served by the HTTP API, and the per-generation [`StepSummary`]. Types
//! flow downstream to `TypeScript` via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`cell`] -- Grid positions, colors, and the stored cell value
//! - [`views`] -- JSON projections served to clients

pub mod cell;
pub mod views;

pub use cell::{Cell, Color, Position};
pub use views::{CellView, GridInfo, StepSummary};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::cell::Position::export_all();
        let _ = crate::cell::Color::export_all();
        let _ = crate::cell::Cell::export_all();
        let _ = crate::views::CellView::export_all();
        let _ = crate::views::GridInfo::export_all();
        let _ = crate::views::StepSummary::export_all();
    }
}
