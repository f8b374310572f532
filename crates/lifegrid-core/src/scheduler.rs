//! Fixed-interval generation scheduler.
//!
//! [`Scheduler::run`] fires once per interval and calls
//! [`Scheduler::step`], which advances the shared [`CellStore`] and then
//! saves the new generation. Steps never overlap: a step guard is held
//! for the whole advance-and-save, and a trigger that finds it taken is
//! skipped rather than queued. Missed interval ticks are skipped too, so a
//! slow step does not cause a burst of catch-up steps afterwards.
//!
//! A failed save is logged and otherwise ignored; the in-memory generation
//! has already been installed and the next step proceeds normally.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use lifegrid_types::StepSummary;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::persist::{PersistError, Snapshot, SnapshotStore};
use crate::step::StepEngine;
use crate::store::CellStore;

/// Result of one scheduler trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// A new generation was installed.
    Completed(StepSummary),
    /// The store was empty; nothing was installed or saved.
    Empty,
    /// Another step was still in flight; this trigger was dropped.
    Busy,
}

/// Callback invoked after each completed step.
///
/// The engine uses this to push summaries to `WebSocket` subscribers.
pub trait StepCallback: Send {
    /// Called after a step installs a new generation.
    fn on_step(&mut self, summary: &StepSummary);
}

/// A step callback that does nothing.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _summary: &StepSummary) {}
}

/// Drives the store forward on a timer and persists each generation.
#[derive(Debug)]
pub struct Scheduler<S> {
    store: CellStore,
    engine: StepEngine,
    snapshots: Arc<S>,
    interval: Duration,
    generation: AtomicU64,
    step_guard: Mutex<()>,
}

impl<S: SnapshotStore> Scheduler<S> {
    /// Create a scheduler starting at generation 0.
    ///
    /// `interval` must be non-zero; [`crate::config::LifegridConfig::validate`]
    /// enforces this for configured values.
    pub fn new(store: CellStore, engine: StepEngine, snapshots: Arc<S>, interval: Duration) -> Self {
        Self {
            store,
            engine,
            snapshots,
            interval,
            generation: AtomicU64::new(0),
            step_guard: Mutex::new(()),
        }
    }

    /// Resume numbering from a restored generation.
    #[must_use]
    pub fn starting_at(self, generation: u64) -> Self {
        self.generation.store(generation, Ordering::Release);
        self
    }

    /// Number of the most recently installed generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// The store this scheduler advances.
    pub const fn store(&self) -> &CellStore {
        &self.store
    }

    /// Advance one generation and save it.
    ///
    /// Returns [`StepResult::Busy`] without doing anything if another step
    /// is still running.
    pub async fn step(&self) -> StepResult {
        let Ok(_guard) = self.step_guard.try_lock() else {
            warn!("previous step still running, skipping this one");
            return StepResult::Busy;
        };

        let started = Instant::now();
        let Some(outcome) = self.store.advance(&self.engine).await else {
            debug!("grid is empty, nothing to step");
            return StepResult::Empty;
        };
        let generation = self
            .generation
            .fetch_add(1, Ordering::AcqRel)
            .saturating_add(1);
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let summary = StepSummary {
            generation,
            tracked: outcome.tracked(),
            alive: outcome.alive,
            births: outcome.births,
            deaths: outcome.deaths,
            duration_ms,
            completed_at: Utc::now(),
        };
        info!(
            generation,
            duration_ms,
            tracked = summary.tracked,
            alive = summary.alive,
            births = summary.births,
            deaths = summary.deaths,
            "step finished"
        );

        let snapshot = Snapshot {
            generation,
            cells: outcome.cells,
        };
        if let Err(e) = self.snapshots.save(&snapshot).await {
            warn!(generation, error = %e, "failed to save snapshot");
        }

        StepResult::Completed(summary)
    }

    /// Save the current generation outside the timer.
    ///
    /// Waits for any in-flight step so the saved snapshot is a whole
    /// generation. Used on shutdown.
    ///
    /// # Errors
    ///
    /// Returns the snapshot store's error unchanged.
    pub async fn save_now(&self) -> Result<(), PersistError> {
        let _guard = self.step_guard.lock().await;
        let snapshot = Snapshot {
            generation: self.generation(),
            cells: self.store.all_tracked().await,
        };
        self.snapshots.save(&snapshot).await
    }

    /// Step once per interval until `shutdown` resolves.
    ///
    /// The first step happens one full interval after the call. Returns
    /// the number of generations installed.
    pub async fn run(
        &self,
        callback: &mut dyn StepCallback,
        shutdown: impl Future<Output = ()>,
    ) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval completes immediately.
        ticker.tick().await;

        info!(interval_secs = self.interval.as_secs(), "scheduler started");

        tokio::pin!(shutdown);
        let mut completed: u64 = 0;
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let StepResult::Completed(summary) = self.step().await {
                        completed = completed.saturating_add(1);
                        callback.on_step(&summary);
                    }
                }
            }
        }

        info!(completed, generation = self.generation(), "scheduler stopped");
        completed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use lifegrid_types::{Cell, Color, Position};

    use super::*;
    use crate::bounds::BoundsPolicy;
    use crate::persist::MemorySnapshotStore;

    const CYAN: Color = Color::new(0, 255, 255);

    fn scheduler() -> Scheduler<MemorySnapshotStore> {
        Scheduler::new(
            CellStore::new(),
            StepEngine::default(),
            Arc::new(MemorySnapshotStore::new()),
            Duration::from_secs(5),
        )
    }

    async fn seed_blinker(store: &CellStore) {
        for x in 0..3 {
            store
                .insert_live(Cell::alive(Position::new(x, 0), CYAN), &BoundsPolicy::default())
                .await;
        }
    }

    struct Recorder {
        generations: Vec<u64>,
    }

    impl StepCallback for Recorder {
        fn on_step(&mut self, summary: &StepSummary) {
            self.generations.push(summary.generation);
        }
    }

    #[tokio::test]
    async fn empty_store_steps_without_saving() {
        let scheduler = scheduler();
        assert_eq!(scheduler.step().await, StepResult::Empty);
        assert!(scheduler.store().is_empty().await);
        assert_eq!(scheduler.snapshots.save_count(), 0);
        assert_eq!(scheduler.generation(), 0);
    }

    #[tokio::test]
    async fn completed_step_saves_new_generation() {
        let scheduler = scheduler();
        seed_blinker(scheduler.store()).await;

        let StepResult::Completed(summary) = scheduler.step().await else {
            panic!("expected a completed step");
        };
        assert_eq!(summary.generation, 1);
        assert_eq!(summary.alive, 3);

        let saved = scheduler.snapshots.latest().await.unwrap();
        assert_eq!(saved.generation, 1);
        assert_eq!(
            u64::try_from(saved.cells.len()).unwrap(),
            summary.tracked
        );
        assert_eq!(scheduler.snapshots.save_count(), 1);
    }

    #[tokio::test]
    async fn save_failure_does_not_roll_back() {
        let scheduler = scheduler();
        seed_blinker(scheduler.store()).await;
        scheduler.snapshots.set_fail_saves(true);

        assert!(matches!(scheduler.step().await, StepResult::Completed(_)));
        assert!(scheduler.store().get(Position::new(1, -1)).await.unwrap().alive);

        assert!(matches!(scheduler.step().await, StepResult::Completed(_)));
        assert_eq!(scheduler.generation(), 2);
        assert!(scheduler.store().get(Position::new(0, 0)).await.unwrap().alive);
    }

    #[tokio::test]
    async fn overlapping_step_is_skipped() {
        let scheduler = scheduler();
        seed_blinker(scheduler.store()).await;

        let guard = scheduler.step_guard.lock().await;
        assert_eq!(scheduler.step().await, StepResult::Busy);
        drop(guard);

        assert!(matches!(scheduler.step().await, StepResult::Completed(_)));
        assert_eq!(scheduler.generation(), 1);
    }

    #[tokio::test]
    async fn starting_at_continues_numbering() {
        let scheduler = scheduler().starting_at(41);
        seed_blinker(scheduler.store()).await;
        let StepResult::Completed(summary) = scheduler.step().await else {
            panic!("expected a completed step");
        };
        assert_eq!(summary.generation, 42);
    }

    #[tokio::test]
    async fn save_now_writes_current_generation() {
        let scheduler = scheduler().starting_at(7);
        seed_blinker(scheduler.store()).await;

        scheduler.save_now().await.unwrap();
        let saved = scheduler.snapshots.latest().await.unwrap();
        assert_eq!(saved.generation, 7);
        assert_eq!(saved.cells.len(), scheduler.store().len().await);
    }

    #[tokio::test(start_paused = true)]
    async fn run_steps_once_per_interval() {
        let scheduler = scheduler();
        seed_blinker(scheduler.store()).await;
        let mut recorder = Recorder {
            generations: Vec::new(),
        };

        let shutdown = tokio::time::sleep(Duration::from_millis(15_500));
        let completed = scheduler.run(&mut recorder, shutdown).await;

        assert_eq!(completed, 3);
        assert_eq!(recorder.generations, vec![1, 2, 3]);
        assert_eq!(scheduler.snapshots.save_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn run_on_empty_store_never_saves() {
        let scheduler = scheduler();
        let completed = scheduler
            .run(&mut NoOpCallback, tokio::time::sleep(Duration::from_secs(30)))
            .await;
        assert_eq!(completed, 0);
        assert_eq!(scheduler.snapshots.save_count(), 0);
    }
}
