//! HTTP API server for the Lifegrid simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Static client** (`/`, `/play`, `/game.js`) served from the
//!   configured public directory
//! - **REST endpoints** for reading and seeding the grid (`/info`,
//!   `/api/getcells`, `/api/addcell`)
//! - **`WebSocket` endpoint** (`/ws/generations`) streaming a
//!   [`StepSummary`] for every completed generation via
//!   [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! Handlers talk to the shared [`CellStore`] directly. Reads copy cells out
//! under the store's read lock; insertions go through
//! [`CellStore::insert_live`] so the bounds check, upsert, and frontier
//! expansion are one atomic operation with respect to generation steps.
//!
//! [`StepSummary`]: lifegrid_types::StepSummary
//! [`CellStore`]: lifegrid_core::store::CellStore
//! [`CellStore::insert_live`]: lifegrid_core::store::CellStore::insert_live

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::spawn_server;
pub use state::AppState;
