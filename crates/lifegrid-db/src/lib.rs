//! Snapshot persistence for the Lifegrid simulation.
//!
//! The engine saves the whole tracked set after every completed step, so
//! the store is a single JSON document that is replaced wholesale:
//!
//! ```text
//! Scheduler step
//!     |
//!     +-- CellStore::advance  (in memory, under the write lock)
//!     |
//!     +-- FileSnapshotStore::save
//!         |-- write  <path>.tmp
//!         +-- rename <path>.tmp -> <path>
//! ```
//!
//! # Modules
//!
//! - [`file_store`] -- JSON file implementation of
//!   [`SnapshotStore`](lifegrid_core::persist::SnapshotStore)

pub mod file_store;

// Re-export primary types for convenience.
pub use file_store::FileSnapshotStore;
pub use lifegrid_core::persist::{PersistError, Snapshot, SnapshotStore};
