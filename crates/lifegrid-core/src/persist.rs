//! Snapshot persistence contract.
//!
//! The engine treats durable storage as an opaque collaborator: the full
//! tracked set is loaded once at startup and saved after every completed,
//! non-empty step. [`SnapshotStore`] is that contract. The file-backed
//! implementation lives in `lifegrid-db`; [`MemorySnapshotStore`] here
//! backs tests and ephemeral runs.
//!
//! Persistence is best-effort relative to the simulation: the scheduler
//! logs a failed save and carries on, and [`restore`] turns a failed load
//! into an empty grid.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use lifegrid_types::Cell;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::frontier;
use crate::grid::{DuplicatePosition, Grid};

/// Errors that can occur while loading or saving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing the backing storage failed.
    #[error("snapshot I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot serialization error: {source}")]
    Serialization {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot decoded but violates a store invariant.
    #[error("corrupt snapshot: {source}")]
    Corrupt {
        /// The violated invariant.
        #[from]
        source: DuplicatePosition,
    },

    /// The backing storage refused the operation.
    #[error("snapshot store unavailable: {reason}")]
    Unavailable {
        /// Explanation of the failure.
        reason: String,
    },
}

/// One persisted generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Generation number the cells belong to.
    #[serde(default)]
    pub generation: u64,
    /// Every tracked cell, alive and dead.
    pub cells: Vec<Cell>,
}

impl Snapshot {
    /// Build the grid this snapshot describes.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Corrupt`] if two cells share a position.
    pub fn into_grid(self) -> Result<Grid, PersistError> {
        Ok(Grid::from_unique_cells(self.cells)?)
    }
}

/// Load the last saved generation for startup.
///
/// Any failure (unreadable storage, bad JSON, duplicate positions) is
/// logged and yields an empty grid at generation 0. Untracked neighbors
/// of restored live cells are filled in, so a snapshot listing only live
/// cells still steps correctly.
pub async fn restore<S: SnapshotStore>(snapshots: &S) -> (Grid, u64) {
    let snapshot = match snapshots.load().await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return (Grid::new(), 0),
        Err(e) => {
            warn!(error = %e, "failed to load snapshot, starting with an empty grid");
            return (Grid::new(), 0);
        }
    };

    let generation = snapshot.generation;
    match snapshot.into_grid() {
        Ok(mut grid) => {
            for cell in grid.alive_only() {
                frontier::expand(&mut grid, &cell);
            }
            (grid, generation)
        }
        Err(e) => {
            warn!(error = %e, "snapshot rejected, starting with an empty grid");
            (Grid::new(), 0)
        }
    }
}

/// Durable load/save of the full cell set.
pub trait SnapshotStore: Send + Sync {
    /// Load the most recently saved snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<Snapshot>, PersistError>> + Send;

    /// Durably replace the saved snapshot with `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> impl Future<Output = Result<(), PersistError>> + Send;
}

/// In-memory [`SnapshotStore`] that counts saves.
///
/// Loads and saves can be made to fail on demand to exercise the
/// recovery paths.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    latest: Mutex<Option<Snapshot>>,
    saves: AtomicU64,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that will load `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            latest: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Acquire)
    }

    /// Make subsequent saves fail (`true`) or succeed (`false`).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Release);
    }

    /// Make subsequent loads fail (`true`) or succeed (`false`).
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::Release);
    }

    /// The most recently saved snapshot.
    pub async fn latest(&self) -> Option<Snapshot> {
        self.latest.lock().await.clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        if self.fail_loads.load(Ordering::Acquire) {
            return Err(PersistError::Unavailable {
                reason: "loads disabled".to_owned(),
            });
        }
        Ok(self.latest.lock().await.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        if self.fail_saves.load(Ordering::Acquire) {
            return Err(PersistError::Unavailable {
                reason: "saves disabled".to_owned(),
            });
        }
        *self.latest.lock().await = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
