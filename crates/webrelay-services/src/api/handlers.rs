//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use tracing::{Instrument, info_span};

use super::ApiState;
use crate::relay::RelayService;

/// `GET /health`.
pub fn health_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// `POST /relay/{channel}`, capped at the relay's body limit.
pub fn relay_routes(relay: Arc<RelayService>) -> Router {
    let limit = relay.max_body_bytes();
    Router::new()
        .route("/relay/{channel}", post(relay_message))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(relay)
}

/// Returns status, version, uptime, and how many channels are joined.
///
/// Channel names are not listed: this endpoint is unauthenticated.
async fn health_check(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.started.elapsed().as_secs(),
        "relay_enabled": state.relay.is_some(),
        "joined_count": state.transport.joined_channels().len(),
    }))
}

async fn relay_message(
    State(relay): State<Arc<RelayService>>,
    Path(channel): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("relay", %request_id, channel = %channel);

    async move {
        // A header that is not visible ASCII can never match a hex digest.
        let claimed = headers
            .get(relay.signature_header())
            .map(|v| v.to_str().unwrap_or(""));

        let outcome = relay.handle(&body, claimed, &channel).await;
        let status =
            StatusCode::from_u16(outcome.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, outcome.body())
    }
    .instrument(span)
    .await
}
