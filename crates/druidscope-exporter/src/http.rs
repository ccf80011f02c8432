//! HTTP handlers: datapoint ingest and Prometheus scrape.
//!
//! Druid's HTTP emitter POSTs a JSON array of event objects; a single object
//! is accepted as a one-element batch. Every element reaches the collector
//! (even non-objects) so the registration counter tracks all delivery
//! attempts; only a body that is not JSON at all is rejected outright.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::Value;

use druidscope_core::render::{render, TEXT_EXPOSITION_CONTENT_TYPE};

use crate::app_state::AppState;

pub async fn ingest_datapoints(State(app): State<AppState>, body: Bytes) -> StatusCode {
    let batch = match parse_batch(&body) {
        Some(batch) => batch,
        None => {
            tracing::warn!(bytes = body.len(), "discarding unparseable datapoint batch");
            app.metrics().posts.inc(&[("result", "bad_json")]);
            return StatusCode::BAD_REQUEST;
        }
    };

    for record in &batch {
        app.collector().ingest(record);
    }
    tracing::debug!(datapoints = batch.len(), "datapoint batch ingested");
    app.metrics().posts.inc(&[("result", "ok")]);
    StatusCode::OK
}

pub async fn serve_metrics(State(app): State<AppState>) -> Response {
    app.metrics().record_scrape();

    let mut out = render(&app.collector().snapshot());
    out.push_str(&app.metrics().render());

    (
        [(header::CONTENT_TYPE, TEXT_EXPOSITION_CONTENT_TYPE)],
        out,
    )
        .into_response()
}

/// Best-effort batch parsing: an array is a batch, any other JSON value is a
/// one-element batch. `None` means nothing parseable was delivered.
fn parse_batch(body: &[u8]) -> Option<Vec<Value>> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value {
        Value::Array(records) => Some(records),
        other => Some(vec![other]),
    }
}
