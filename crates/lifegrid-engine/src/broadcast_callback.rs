//! Step callback that feeds the API's `WebSocket` stream.

use std::sync::Arc;

use lifegrid_api::state::AppState;
use lifegrid_core::scheduler::StepCallback;
use lifegrid_types::StepSummary;
use tracing::debug;

/// Callback that bridges the scheduler to the API broadcast channel.
pub struct BroadcastCallback {
    state: Arc<AppState>,
}

impl BroadcastCallback {
    /// Create a callback publishing through `state`.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl StepCallback for BroadcastCallback {
    fn on_step(&mut self, summary: &StepSummary) {
        let receivers = self.state.broadcast(summary);
        debug!(generation = summary.generation, receivers, "Step broadcast sent");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use lifegrid_core::bounds::BoundsPolicy;
    use lifegrid_core::store::CellStore;

    use super::*;

    #[tokio::test]
    async fn forwards_summaries_to_subscribers() {
        let state = Arc::new(AppState::new(
            CellStore::new(),
            BoundsPolicy::default(),
            5,
            "public",
        ));
        let mut rx = state.subscribe();
        let mut callback = BroadcastCallback::new(Arc::clone(&state));

        let summary = StepSummary {
            generation: 9,
            tracked: 0,
            alive: 0,
            births: 0,
            deaths: 0,
            duration_ms: 1,
            completed_at: Utc::now(),
        };
        callback.on_step(&summary);

        assert_eq!(rx.recv().await.unwrap().generation, 9);
    }
}
