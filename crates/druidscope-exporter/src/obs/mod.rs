//! Exporter self-observability.
//!
//! Tracks the exporter's own request handling (not Druid state, which lives
//! in the core collector) and renders it as extra exposition lines appended
//! to every scrape.

pub mod metrics;
