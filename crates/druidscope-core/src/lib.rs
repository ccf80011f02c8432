//! druidscope core: the Druid metric registry, the in-memory aggregation
//! engine, and the Prometheus text renderer.
//!
//! This crate holds the whole aggregation pipeline and carries no transport
//! or runtime dependencies so it can be reused and tested without an HTTP
//! stack: a static registry of recognized Druid event metrics, a `Collector`
//! that folds pushed datapoints into cumulative histogram and last-write-wins
//! counter state, and a renderer that turns a point-in-time snapshot into
//! exposition text.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Ingest in particular must never raise for any record shape; malformed
//! datapoints are counted and dropped, never surfaced as errors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod collector;
pub mod datapoint;
pub mod error;
pub mod registry;
pub mod render;

pub use collector::{Collector, Snapshot};
pub use error::{DruidScopeError, Result};
pub use registry::{Daemon, Dimension, EmptyPolicy, MetricKind, MetricSpec};
