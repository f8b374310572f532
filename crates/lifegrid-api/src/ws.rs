//! `WebSocket` stream of completed generations.
//!
//! Clients connect to `GET /ws/generations` and receive one JSON
//! [`StepSummary`] frame per installed generation. A client that falls
//! behind the broadcast buffer skips to the newest summary instead of
//! replaying stale ones. Incoming frames other than ping and close are
//! ignored.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use lifegrid_types::StepSummary;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade to a `WebSocket` and stream step summaries.
///
/// # Route
///
/// `GET /ws/generations`
pub async fn ws_generations(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| stream_generations(socket, state))
}

/// Encode a summary as a text frame.
fn summary_frame(summary: &StepSummary) -> Option<Message> {
    match serde_json::to_string(summary) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            warn!(generation = summary.generation, error = %e, "failed to encode step summary");
            None
        }
    }
}

async fn stream_generations(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.subscribe();
    debug!("generation stream opened");

    let reason = loop {
        tokio::select! {
            received = rx.recv() => match received {
                Ok(summary) => {
                    let Some(frame) = summary_frame(&summary) else {
                        continue;
                    };
                    if socket.send(frame).await.is_err() {
                        break "send failed";
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "generation stream lagged");
                }
                Err(RecvError::Closed) => break "broadcast closed",
            },
            incoming = socket.recv() => match incoming {
                None | Some(Ok(Message::Close(_))) => break "client closed",
                Some(Err(_)) => break "socket error",
                Some(Ok(Message::Ping(payload))) => {
                    if socket.send(Message::Pong(payload)).await.is_err() {
                        break "pong failed";
                    }
                }
                Some(Ok(_)) => {}
            },
        }
    };

    debug!(reason, "generation stream closed");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn frame_is_summary_json() {
        let summary = StepSummary {
            generation: 4,
            tracked: 30,
            alive: 3,
            births: 2,
            deaths: 2,
            duration_ms: 0,
            completed_at: Utc::now(),
        };
        let Some(Message::Text(text)) = summary_frame(&summary) else {
            panic!("summary should encode as a text frame");
        };
        let decoded: StepSummary = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(decoded, summary);
    }
}
