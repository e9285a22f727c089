//! HTTP API for webrelay.
//!
//! Exposes the signed relay endpoint and a health check. The relay route
//! only exists when a [`RelayService`] was built, so an unconfigured
//! instance answers `POST /relay/{channel}` with 404.

pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::trace::TraceLayer;

use webrelay_channels::ChatTransport;

use crate::relay::RelayService;

/// Shared state accessible by all API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// The relay, when a shared secret is configured.
    pub relay: Option<Arc<RelayService>>,
    /// Chat transport, read by the health check.
    pub transport: Arc<dyn ChatTransport>,
    /// Process start, for uptime reporting.
    pub started: Instant,
}

impl ApiState {
    pub fn new(relay: Option<RelayService>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            relay: relay.map(Arc::new),
            transport,
            started: Instant::now(),
        }
    }
}

/// Build the API router with all routes.
pub fn build_router(state: ApiState) -> Router {
    let mut router = handlers::health_routes(state.clone());
    if let Some(relay) = state.relay {
        router = router.merge(handlers::relay_routes(relay));
    }
    router.layer(TraceLayer::new_for_http())
}
