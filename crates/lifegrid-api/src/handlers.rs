//! REST endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/info` | Step interval and tracked cell count |
//! | `GET` | `/api/getcells` | Every live cell, keyed by an arbitrary index |
//! | `POST` | `/api/addcell` | Place a live cell |

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lifegrid_types::{Cell, CellView, Color, GridInfo, Position};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/addcell`.
///
/// Every field is required; color channels must fit in `0..=255`.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct AddCellRequest {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl AddCellRequest {
    /// Parse a request body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MalformedCell`] for an empty body, invalid JSON,
    /// a missing field, or an out-of-range value.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.is_empty() {
            return Err(ApiError::MalformedCell("empty body".to_owned()));
        }
        serde_json::from_slice(body).map_err(|e| ApiError::MalformedCell(e.to_string()))
    }

    /// The live cell this request asks for.
    pub const fn into_cell(self) -> Cell {
        Cell::alive(Position::new(self.x, self.y), Color::new(self.r, self.g, self.b))
    }
}

// ---------------------------------------------------------------------------
// GET /info
// ---------------------------------------------------------------------------

/// Report the step interval and the number of tracked cells.
pub async fn info(State(state): State<Arc<AppState>>) -> Json<GridInfo> {
    let tracked = state.store.len().await;
    Json(GridInfo {
        update: state.tick_interval_secs,
        totalcells: u64::try_from(tracked).unwrap_or(u64::MAX),
    })
}

// ---------------------------------------------------------------------------
// GET /api/getcells
// ---------------------------------------------------------------------------

/// Return every live cell.
///
/// The keys are serialization indices only; they carry no meaning and
/// change between calls.
pub async fn get_cells(State(state): State<Arc<AppState>>) -> Json<BTreeMap<usize, CellView>> {
    let alive = state.store.alive_only().await;
    Json(
        alive
            .iter()
            .map(CellView::from)
            .enumerate()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// POST /api/addcell
// ---------------------------------------------------------------------------

/// Place a live cell and track its frontier.
///
/// A cell outside the envelope is silently dropped and still answers
/// `200 OK`.
pub async fn add_cell(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = AddCellRequest::parse(&body)?;
    state
        .store
        .insert_live(request.into_cell(), &state.bounds)
        .await;
    Ok((StatusCode::OK, "OK"))
}
