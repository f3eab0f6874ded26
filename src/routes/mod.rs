//! Route tables and the assembled application router.

mod common;
mod plants;

pub use common::common_routes_with_ready;
pub use plants::plant_routes;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Plant routes plus health/readiness/version, with request tracing and a body size cap.
/// The cap is enforced by the body extractor, so an oversized write fails like any other bad body.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(plant_routes(state))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
