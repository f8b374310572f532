//! Shared application state for the API server.
//!
//! [`AppState`] holds a handle to the engine's [`CellStore`], the values
//! handlers need from configuration, and the broadcast channel that fans
//! step summaries out to `WebSocket` clients.

use std::path::PathBuf;

use lifegrid_core::bounds::BoundsPolicy;
use lifegrid_core::store::CellStore;
use lifegrid_types::StepSummary;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for step summaries.
///
/// A subscriber that falls further behind than this receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest message.
const BROADCAST_CAPACITY: usize = 64;

/// Shared state for the Axum application.
///
/// Wrapped in [`std::sync::Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The live grid shared with the scheduler.
    pub store: CellStore,
    /// Envelope applied to client insertions.
    pub bounds: BoundsPolicy,
    /// Seconds between generations, reported by `/info`.
    pub tick_interval_secs: u64,
    /// Directory holding the static client files.
    pub public_dir: PathBuf,
    /// Broadcast sender for step summaries.
    pub tx: broadcast::Sender<StepSummary>,
}

impl AppState {
    /// Create application state around an existing store.
    pub fn new(
        store: CellStore,
        bounds: BoundsPolicy,
        tick_interval_secs: u64,
        public_dir: impl Into<PathBuf>,
    ) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            store,
            bounds,
            tick_interval_secs,
            public_dir: public_dir.into(),
            tx,
        }
    }

    /// Subscribe to the step broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<StepSummary> {
        self.tx.subscribe()
    }

    /// Publish a step summary to all connected clients.
    ///
    /// Returns the number of receivers; 0 when no client is connected.
    pub fn broadcast(&self, summary: &StepSummary) -> usize {
        // send only fails when there are zero receivers.
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}
