use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use hll_ledger::LogService;

use crate::handler::{self, AppState};

/// Build the axum router with all HLL endpoints.
pub fn build_router(log: Arc<dyn LogService>) -> Router {
    Router::new()
        .route("/logs", get(handler::read_all_handler))
        .route("/logs/entry", post(handler::append_handler))
        .route("/logs/verify", get(handler::verify_handler))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(log))
}
