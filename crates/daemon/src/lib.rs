#![forbid(unsafe_code)]

//! HTTP backend: next-session resolution over the schedule snapshot and
//! thin proxies onto the upstream race-data APIs.

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod upstream;

pub fn router(state: api::AppState) -> Router {
    Router::new()
        .route("/healthz", get(api::healthz))
        .route("/api/next-session", get(api::next_session))
        .route("/api/schedule", get(api::schedule))
        .route("/api/schedule/last-results", get(api::last_results))
        .route("/api/standings/drivers/{season}", get(api::driver_standings))
        .route(
            "/api/standings/constructors/{season}",
            get(api::constructor_standings),
        )
        .route("/api/results/{season}/{round}", get(api::race_results))
        .route("/api/circuits/{season}", get(api::circuits))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
