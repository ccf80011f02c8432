//! druidscope exporter.
//!
//! Receives push-style Druid monitoring events over HTTP and re-exposes
//! them as a Prometheus scrape endpoint:
//! - POST /         <- Druid HTTP emitter (JSON datapoint batches)
//! - GET  /metrics  -> text exposition snapshot

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use druidscope_exporter::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "druidscope.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .exporter
        .listen
        .parse()
        .expect("exporter.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("app state init failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "druidscope-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
