//! Axum router construction.
//!
//! Assembles the static client, the REST API, and the `WebSocket` stream
//! into a single [`Router`] with CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- landing page (`index.html`)
/// - `GET /play` -- game page (`play.html`)
/// - `GET /game.js` -- browser client
/// - `GET /info` -- step interval and tracked cell count
/// - `GET /api/getcells` -- live cells
/// - `POST /api/addcell` -- place a live cell
/// - `GET /ws/generations` -- `WebSocket` step summary stream
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = state.public_dir.clone();

    Router::new()
        // Static client
        .route_service("/", ServeFile::new(public.join("index.html")))
        .route_service("/play", ServeFile::new(public.join("play.html")))
        .route_service("/game.js", ServeFile::new(public.join("game.js")))
        // REST API
        .route("/info", get(handlers::info))
        .route("/api/getcells", get(handlers::get_cells))
        .route("/api/addcell", post(handlers::add_cell))
        // WebSocket
        .route("/ws/generations", get(ws::ws_generations))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
