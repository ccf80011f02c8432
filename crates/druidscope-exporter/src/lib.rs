//! druidscope exporter library entry.
//!
//! This crate wires the HTTP surface around the core collector: the ingest
//! endpoint Druid's HTTP emitter pushes datapoint batches to, the Prometheus
//! scrape endpoint, config loading, and exporter self-metrics. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod http;
pub mod obs;
pub mod router;
