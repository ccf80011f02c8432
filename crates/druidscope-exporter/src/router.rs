//! Axum router wiring.
//!
//! `POST /` receives datapoint batches from Druid's HTTP emitter;
//! `GET /metrics` serves the Prometheus exposition snapshot.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, http};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(http::ingest_datapoints))
        .route("/metrics", get(http::serve_metrics))
        .with_state(state)
}
