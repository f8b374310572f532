//! Cell store, generation stepping, and scheduling for the Lifegrid
//! simulation.
//!
//! This crate owns the engine behind the shared Game of Life grid: a
//! sparse store of tracked cells, the Moore-neighborhood rules that turn
//! one generation into the next, the dead-cell frontier that lets births
//! be discovered without scanning the whole plane, and the fixed-interval
//! scheduler that drives it all.
//!
//! # Modules
//!
//! - [`grid`] -- [`Grid`], the plain position-keyed cell mapping.
//! - [`neighbors`] -- Moore neighborhood offsets and live-neighbor counting.
//! - [`frontier`] -- Dead placeholder insertion around changed cells.
//! - [`bounds`] -- [`BoundsPolicy`], the symmetric coordinate envelope.
//! - [`step`] -- [`StepEngine`] and the transition rules.
//! - [`store`] -- [`CellStore`], the shared, lock-guarded grid handle.
//! - [`persist`] -- [`SnapshotStore`] contract and an in-memory implementation.
//! - [`scheduler`] -- The interval loop with at-most-one step in flight.
//! - [`config`] -- Configuration loading from `lifegrid-config.yaml`.
//!
//! [`Grid`]: grid::Grid
//! [`BoundsPolicy`]: bounds::BoundsPolicy
//! [`StepEngine`]: step::StepEngine
//! [`CellStore`]: store::CellStore
//! [`SnapshotStore`]: persist::SnapshotStore

pub mod bounds;
pub mod config;
pub mod frontier;
pub mod grid;
pub mod neighbors;
pub mod persist;
pub mod scheduler;
pub mod step;
pub mod store;
