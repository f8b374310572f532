//! Lifegrid engine binary.
//!
//! This is the main entry point that wires together the cell store, the
//! generation scheduler, snapshot persistence, and the HTTP API. It loads
//! configuration, restores the last saved generation, and steps the grid
//! until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lifegrid-config.yaml` (or `LIFEGRID_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Restore the last snapshot, falling back to an empty grid
//! 4. Start the HTTP API server
//! 5. Run the scheduler until Ctrl-C
//! 6. Stop the HTTP server and save the final generation if configured

mod broadcast_callback;
mod error;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lifegrid_api::server::ServerConfig;
use lifegrid_api::state::AppState;
use lifegrid_core::config::LifegridConfig;
use lifegrid_core::persist;
use lifegrid_core::scheduler::Scheduler;
use lifegrid_core::step::StepEngine;
use lifegrid_core::store::CellStore;
use lifegrid_db::FileSnapshotStore;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::broadcast_callback::BroadcastCallback;
use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "lifegrid-config.yaml";

/// How long the HTTP server may take to drain after the scheduler stops.
const SERVER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot start.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration (before logging, which it configures).
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("lifegrid-engine starting");
    info!(
        source = %config_source,
        bounds = config.grid.bounds,
        tick_interval_secs = config.scheduler.tick_interval_secs,
        snapshot_path = %config.persistence.snapshot_path.display(),
        "Configuration loaded"
    );

    // 3. Restore the last snapshot.
    let snapshots = Arc::new(FileSnapshotStore::new(&config.persistence.snapshot_path));
    let (grid, generation) = persist::restore(snapshots.as_ref()).await;
    info!(
        generation,
        tracked = grid.len(),
        alive = grid.alive_count(),
        "Grid restored"
    );
    let store = CellStore::from_grid(grid);

    // 4. Start the HTTP API server.
    let app_state = Arc::new(AppState::new(
        store.clone(),
        config.bounds_policy(),
        config.scheduler.tick_interval_secs,
        config.server.public_dir.clone(),
    ));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let (stop_server, server_stopped) = oneshot::channel::<()>();
    let server_handle = lifegrid_api::spawn_server(
        server_config,
        Arc::clone(&app_state),
        async move {
            // A dropped sender also means stop.
            let _ = server_stopped.await;
        },
    )?;

    // 5. Run the scheduler until Ctrl-C.
    let scheduler = Scheduler::new(
        store,
        StepEngine::new(config.bounds_policy()),
        Arc::clone(&snapshots),
        config.tick_interval(),
    )
    .starting_at(generation);
    let mut callback = BroadcastCallback::new(app_state);

    let steps = scheduler.run(&mut callback, shutdown_signal()).await;

    if stop_server.send(()).is_err() {
        warn!("HTTP server task already exited");
    }
    if tokio::time::timeout(SERVER_DRAIN_TIMEOUT, server_handle)
        .await
        .is_err()
    {
        warn!("HTTP server did not drain in time");
    }

    // 6. Save the final generation.
    if config.persistence.save_on_shutdown {
        match scheduler.save_now().await {
            Ok(()) => info!(generation = scheduler.generation(), "Final snapshot saved"),
            Err(e) => warn!(error = %e, "failed to save final snapshot"),
        }
    }

    info!(
        steps,
        generation = scheduler.generation(),
        "lifegrid-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `LIFEGRID_CONFIG` or the default path.
///
/// A missing file is not an error: defaults (plus environment overrides)
/// are used. Returns the config and a description of where it came from.
fn load_config() -> Result<(LifegridConfig, String), EngineError> {
    let path = std::env::var_os("LIFEGRID_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = LifegridConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        let mut config = LifegridConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok((config, "defaults".to_owned()))
    }
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
