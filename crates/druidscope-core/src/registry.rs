//! Static registry of recognized Druid event metrics.
//!
//! The registry is the single source of truth for how an incoming datapoint
//! is shaped into collector state: which daemons emit a metric, whether it
//! aggregates as a cumulative histogram or a last-write-wins counter, which
//! optional dimensions it consumes, and the name it renders under. There is
//! no dynamic metric discovery; anything not enumerated here is dropped.
//!
//! A metric name may appear in more than one entry when daemons disagree on
//! its shape (`segment/count` carries a tier for the historical but not for
//! the coordinator), so lookup is always by `(metric, daemon)`.

use crate::error::{DruidScopeError, Result};

/// Druid daemon roles this exporter understands, as they appear in the
/// `service` field after the `druid/` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Daemon {
    Coordinator,
    Historical,
    Broker,
}

impl Daemon {
    pub fn as_str(self) -> &'static str {
        match self {
            Daemon::Coordinator => "coordinator",
            Daemon::Historical => "historical",
            Daemon::Broker => "broker",
        }
    }

    /// Parse a daemon role string (the part of `service` after the slash).
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            "coordinator" => Some(Daemon::Coordinator),
            "historical" => Some(Daemon::Historical),
            "broker" => Some(Daemon::Broker),
            _ => None,
        }
    }
}

/// Optional datapoint dimensions a metric may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Tier,
    DataSource,
    Server,
}

impl Dimension {
    /// Key under which the dimension arrives in a datapoint.
    pub fn record_key(self) -> &'static str {
        match self {
            Dimension::Tier => "tier",
            Dimension::DataSource => "dataSource",
            Dimension::Server => "server",
        }
    }

    /// Prometheus label name the dimension renders under.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Tier => "tier",
            Dimension::DataSource => "datasource",
            Dimension::Server => "server",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Cumulative le-bucket histogram keyed by datasource.
    Histogram,
    /// Last-write-wins scalar keyed by the declared dimensions.
    Counter,
}

/// What to render for a family that has never received data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Emit one `NaN` sample so the series always exists. Only sound for
    /// families without dimensions.
    RenderNan,
    /// Emit nothing; the label values are unknown until observed.
    Omit,
}

/// One registry entry: a Druid event metric and how to aggregate/render it.
#[derive(Debug)]
pub struct MetricSpec {
    /// Metric name as emitted by Druid (e.g. `query/time`).
    pub event_name: &'static str,
    /// Daemons this entry applies to.
    pub daemons: &'static [Daemon],
    pub kind: MetricKind,
    /// Dimensions consumed, in declared (and rendered) order.
    pub dims: &'static [Dimension],
    pub empty_policy: EmptyPolicy,
    /// Rendered name suffix; the full name is `druid_<daemon>_<suffix>`.
    pub suffix: &'static str,
    pub help: &'static str,
}

impl MetricSpec {
    const fn histogram(
        event_name: &'static str,
        daemons: &'static [Daemon],
        suffix: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            event_name,
            daemons,
            kind: MetricKind::Histogram,
            dims: &[Dimension::DataSource],
            empty_policy: EmptyPolicy::Omit,
            suffix,
            help,
        }
    }

    const fn counter(
        event_name: &'static str,
        daemons: &'static [Daemon],
        dims: &'static [Dimension],
        suffix: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            event_name,
            daemons,
            kind: MetricKind::Counter,
            dims,
            empty_policy: EmptyPolicy::Omit,
            suffix,
            help,
        }
    }

    /// A daemon-scoped scalar with no dimensions; rendered as `NaN` until
    /// the first datapoint arrives.
    const fn scalar(
        event_name: &'static str,
        daemons: &'static [Daemon],
        suffix: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            event_name,
            daemons,
            kind: MetricKind::Counter,
            dims: &[],
            empty_policy: EmptyPolicy::RenderNan,
            suffix,
            help,
        }
    }

    /// Full rendered metric name for one daemon.
    pub fn rendered_name(&self, daemon: Daemon) -> String {
        format!("druid_{}_{}", daemon.as_str(), self.suffix)
    }
}

const CO: &[Daemon] = &[Daemon::Coordinator];
const HI: &[Daemon] = &[Daemon::Historical];
const BH: &[Daemon] = &[Daemon::Broker, Daemon::Historical];

const TIER: &[Dimension] = &[Dimension::Tier];
const DS: &[Dimension] = &[Dimension::DataSource];
const SERVER: &[Dimension] = &[Dimension::Server];
const TIER_DS: &[Dimension] = &[Dimension::Tier, Dimension::DataSource];

/// Every event metric the exporter recognizes.
pub const REGISTRY: &[MetricSpec] = &[
    MetricSpec::histogram("query/time", BH, "query_time_ms", "Query response time in milliseconds"),
    MetricSpec::histogram("query/bytes", BH, "query_bytes", "Query response size in bytes"),
    MetricSpec::histogram("query/node/time", BH, "query_node_time_ms", "Per-node query time in milliseconds"),
    MetricSpec::scalar("query/cache/total/numEntries", BH, "query_cache_numentries_count", "Number of entries in the query cache"),
    MetricSpec::scalar("query/cache/total/sizeBytes", BH, "query_cache_sizebytes_count", "Size of the query cache in bytes"),
    MetricSpec::scalar("query/cache/total/hits", BH, "query_cache_hits_count", "Query cache hits"),
    MetricSpec::scalar("query/cache/total/misses", BH, "query_cache_misses_count", "Query cache misses"),
    MetricSpec::scalar("query/cache/total/evictions", BH, "query_cache_evictions_count", "Query cache evictions"),
    MetricSpec::scalar("query/cache/total/timeouts", BH, "query_cache_timeouts_count", "Query cache timeouts"),
    MetricSpec::scalar("query/cache/total/errors", BH, "query_cache_errors_count", "Query cache errors"),
    MetricSpec::counter("segment/count", CO, DS, "segment_count", "Number of served segments per datasource"),
    MetricSpec::counter("segment/count", HI, TIER_DS, "segment_count", "Number of served segments per tier and datasource"),
    MetricSpec::scalar("segment/max", HI, "max_segment_bytes", "Maximum segment storage in bytes"),
    MetricSpec::counter("segment/used", HI, TIER_DS, "segment_used_bytes", "Used segment storage in bytes per tier and datasource"),
    MetricSpec::scalar("segment/scan/pending", HI, "segment_scan_pending", "Segment scans waiting for execution"),
    MetricSpec::counter("segment/assigned/count", CO, TIER, "segment_assigned_count", "Segments assigned for loading per tier"),
    MetricSpec::counter("segment/moved/count", CO, TIER, "segment_moved_count", "Segments moved per tier"),
    MetricSpec::counter("segment/dropped/count", CO, TIER, "segment_dropped_count", "Segments dropped per tier"),
    MetricSpec::counter("segment/deleted/count", CO, TIER, "segment_deleted_count", "Segments marked as unused per tier"),
    MetricSpec::counter("segment/unneeded/count", CO, TIER, "segment_unneeded_count", "Segments dropped as unneeded per tier"),
    MetricSpec::scalar("segment/overShadowed/count", CO, "segment_overshadowed_count", "Overshadowed segments"),
    MetricSpec::counter("segment/loadQueue/failed", CO, SERVER, "segment_loadqueue_failed", "Segments that failed to load per server"),
    MetricSpec::counter("segment/loadQueue/count", CO, SERVER, "segment_loadqueue_count", "Segments queued for loading per server"),
    MetricSpec::counter("segment/dropQueue/count", CO, SERVER, "segment_dropqueue_count", "Segments queued for dropping per server"),
    MetricSpec::counter("segment/size", CO, DS, "segment_size_bytes", "Total segment size in bytes per datasource"),
    MetricSpec::counter("segment/unavailable/count", CO, DS, "segment_unavailable_count", "Segments left to load per datasource"),
    MetricSpec::counter("segment/underReplicated/count", CO, TIER_DS, "segment_underreplicated_count", "Under-replicated segments per tier and datasource"),
];

/// Resolve the registry entry for `(metric, daemon)`, if any.
pub fn lookup(event_name: &str, daemon: Daemon) -> Option<&'static MetricSpec> {
    REGISTRY
        .iter()
        .find(|spec| spec.event_name == event_name && spec.daemons.contains(&daemon))
}

/// Check registry consistency once at startup.
///
/// Every `(metric, daemon)` pair must resolve to exactly one entry, declared
/// dimensions must not repeat, and histograms are always keyed by datasource.
pub fn validate() -> Result<()> {
    let mut seen: Vec<(&str, Daemon)> = Vec::new();
    for spec in REGISTRY {
        if spec.daemons.is_empty() {
            return Err(DruidScopeError::Registry(format!(
                "{}: empty daemon list",
                spec.event_name
            )));
        }
        for &daemon in spec.daemons {
            let pair = (spec.event_name, daemon);
            if seen.contains(&pair) {
                return Err(DruidScopeError::Registry(format!(
                    "{}: duplicate entry for {}",
                    spec.event_name,
                    daemon.as_str()
                )));
            }
            seen.push(pair);
        }
        for (i, dim) in spec.dims.iter().enumerate() {
            if spec.dims[..i].contains(dim) {
                return Err(DruidScopeError::Registry(format!(
                    "{}: dimension {} declared twice",
                    spec.event_name,
                    dim.label()
                )));
            }
        }
        if spec.kind == MetricKind::Histogram && spec.dims != DS {
            return Err(DruidScopeError::Registry(format!(
                "{}: histograms are keyed by datasource only",
                spec.event_name
            )));
        }
        if spec.empty_policy == EmptyPolicy::RenderNan && !spec.dims.is_empty() {
            return Err(DruidScopeError::Registry(format!(
                "{}: placeholder rendering needs a dimension-less metric",
                spec.event_name
            )));
        }
    }
    Ok(())
}
