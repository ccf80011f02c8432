//! Decode-once classification of raw datapoints.
//!
//! The HTTP listener delivers best-effort parsed JSON values; everything the
//! collector needs to know about a record is resolved here in a single pass:
//! feed check, daemon role, registry entry, numeric value, and borrowed
//! dimension values. A record that cannot be classified yields a
//! [`DropReason`] instead of an error; ingest never fails.

use serde_json::Value;

use crate::registry::{self, Daemon, Dimension, MetricSpec};

/// Why a datapoint contributed nothing to collector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Not a JSON object at all.
    NotAnObject,
    /// `feed` missing or not `"metrics"`.
    WrongFeed,
    /// `service` missing, or its role is unknown or not enabled.
    UnknownDaemon,
    /// `metric` missing or not registered for this daemon.
    UnknownMetric,
    /// `value` missing or not numeric.
    MissingValue,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::NotAnObject => "not_an_object",
            DropReason::WrongFeed => "wrong_feed",
            DropReason::UnknownDaemon => "unknown_daemon",
            DropReason::UnknownMetric => "unknown_metric",
            DropReason::MissingValue => "missing_value",
        }
    }
}

/// A classified datapoint, borrowing dimension values from the record.
#[derive(Debug)]
pub struct Datapoint<'a> {
    pub spec: &'static MetricSpec,
    pub daemon: Daemon,
    pub value: f64,
    pub data_source: Option<&'a str>,
    pub tier: Option<&'a str>,
    pub server: Option<&'a str>,
}

impl<'a> Datapoint<'a> {
    /// Value of one dimension, if the record carried it.
    pub fn dim(&self, dim: Dimension) -> Option<&'a str> {
        match dim {
            Dimension::Tier => self.tier,
            Dimension::DataSource => self.data_source,
            Dimension::Server => self.server,
        }
    }
}

fn get_str<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Classify one raw record against the registry and the enabled daemon set.
pub fn classify<'a>(record: &'a Value, enabled: &[Daemon]) -> Result<Datapoint<'a>, DropReason> {
    if !record.is_object() {
        return Err(DropReason::NotAnObject);
    }
    if get_str(record, "feed") != Some("metrics") {
        return Err(DropReason::WrongFeed);
    }

    // Daemon role is the service name after the last slash
    // ("druid/historical" -> "historical").
    let service = get_str(record, "service").ok_or(DropReason::UnknownDaemon)?;
    let role = service.rsplit_once('/').map_or(service, |(_, role)| role);
    let daemon = Daemon::from_role(role)
        .filter(|d| enabled.contains(d))
        .ok_or(DropReason::UnknownDaemon)?;

    let metric = get_str(record, "metric").ok_or(DropReason::UnknownMetric)?;
    let spec = registry::lookup(metric, daemon).ok_or(DropReason::UnknownMetric)?;

    let value = record
        .get("value")
        .and_then(Value::as_f64)
        .ok_or(DropReason::MissingValue)?;

    Ok(Datapoint {
        spec,
        daemon,
        value,
        data_source: get_str(record, Dimension::DataSource.record_key()),
        tier: get_str(record, Dimension::Tier.record_key()),
        server: get_str(record, Dimension::Server.record_key()),
    })
}
