//! The in-memory aggregation engine.
//!
//! One `Collector` instance lives for the whole process, shared between the
//! ingest path (one call per pushed datapoint, concurrent) and the scrape
//! path (periodic snapshots). Both state mappings sit behind a single mutex;
//! ingest holds it for one leaf update, snapshot for a clone, so no reader
//! ever observes a half-updated leaf. The datapoints-registered counter is
//! an atomic updated outside the lock: it counts ingest *calls*, recognized
//! or not.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::datapoint::{classify, Datapoint};
use crate::registry::{Daemon, Dimension, MetricKind};

/// Upper bounds of the fixed histogram buckets; a sixth `+Inf` bucket is
/// implicit and always incremented.
pub const BUCKET_BOUNDS: [f64; 5] = [10.0, 100.0, 500.0, 1000.0, 10000.0];

/// Number of buckets per leaf, `+Inf` included.
pub const BUCKET_COUNT: usize = BUCKET_BOUNDS.len() + 1;

/// Sentinel datasource for histogram datapoints that carry none.
pub const DEFAULT_DATA_SOURCE: &str = "default";

/// One histogram leaf: cumulative le-buckets plus the raw-value sum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramLeaf {
    pub buckets: [u64; BUCKET_COUNT],
    pub sum: f64,
}

impl HistogramLeaf {
    fn observe(&mut self, value: f64) {
        for (i, bound) in BUCKET_BOUNDS.iter().enumerate() {
            if value <= *bound {
                self.buckets[i] += 1;
            }
        }
        self.buckets[BUCKET_COUNT - 1] += 1;
        self.sum += value;
    }

    /// Total observation count (the `+Inf` bucket).
    pub fn count(&self) -> u64 {
        self.buckets[BUCKET_COUNT - 1]
    }
}

/// Composite key of a histogram leaf.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HistogramKey {
    pub metric: &'static str,
    pub daemon: Daemon,
    pub data_source: String,
}

/// Composite key of a counter leaf: the declared dimensions that were
/// actually present in the record, in declared order. Absent dimensions are
/// omitted, never substituted with a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CounterKey {
    pub metric: &'static str,
    pub daemon: Daemon,
    pub labels: Vec<(Dimension, String)>,
}

#[derive(Debug, Clone, Default)]
struct AggState {
    histograms: BTreeMap<HistogramKey, HistogramLeaf>,
    counters: BTreeMap<CounterKey, f64>,
}

/// Consistent point-in-time view of collector state, taken under the lock.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub enabled: Vec<Daemon>,
    pub histograms: BTreeMap<HistogramKey, HistogramLeaf>,
    pub counters: BTreeMap<CounterKey, f64>,
    pub datapoints_registered: u64,
}

/// Stateful aggregation engine fed by the ingest listener and read by the
/// scrape handler.
pub struct Collector {
    enabled: Vec<Daemon>,
    state: Mutex<AggState>,
    datapoints_registered: AtomicU64,
}

impl Collector {
    pub fn new(enabled: Vec<Daemon>) -> Self {
        Self {
            enabled,
            state: Mutex::new(AggState::default()),
            datapoints_registered: AtomicU64::new(0),
        }
    }

    /// Daemons this collector accepts datapoints from.
    pub fn enabled_daemons(&self) -> &[Daemon] {
        &self.enabled
    }

    // A poisoned lock still holds structurally valid state; ingest and
    // snapshot must keep working rather than propagate the panic.
    fn lock_state(&self) -> MutexGuard<'_, AggState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fold one raw datapoint into collector state.
    ///
    /// Counts the call first, then classifies; unrecognized or malformed
    /// records are dropped silently. Never fails, never panics.
    pub fn ingest(&self, record: &Value) {
        self.datapoints_registered.fetch_add(1, Ordering::Relaxed);

        let dp = match classify(record, &self.enabled) {
            Ok(dp) => dp,
            Err(reason) => {
                tracing::debug!(reason = reason.as_str(), "datapoint dropped");
                return;
            }
        };

        let mut state = self.lock_state();
        match dp.spec.kind {
            MetricKind::Histogram => {
                let key = HistogramKey {
                    metric: dp.spec.event_name,
                    daemon: dp.daemon,
                    data_source: dp
                        .data_source
                        .unwrap_or(DEFAULT_DATA_SOURCE)
                        .to_string(),
                };
                state.histograms.entry(key).or_default().observe(dp.value);
            }
            MetricKind::Counter => {
                let key = CounterKey {
                    metric: dp.spec.event_name,
                    daemon: dp.daemon,
                    labels: counter_labels(&dp),
                };
                state.counters.insert(key, dp.value);
            }
        }
    }

    /// Clone both mappings under the lock and read the registration counter.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock_state().clone();
        Snapshot {
            enabled: self.enabled.clone(),
            histograms: state.histograms,
            counters: state.counters,
            datapoints_registered: self.datapoints_registered.load(Ordering::Relaxed),
        }
    }

    /// Number of ingest calls made so far, recognized or not.
    pub fn datapoints_registered(&self) -> u64 {
        self.datapoints_registered.load(Ordering::Relaxed)
    }
}

fn counter_labels(dp: &Datapoint<'_>) -> Vec<(Dimension, String)> {
    dp.spec
        .dims
        .iter()
        .filter_map(|&dim| dp.dim(dim).map(|value| (dim, value.to_string())))
        .collect()
}

impl Snapshot {
    /// Histogram leaf for `(metric, daemon, datasource)`, if observed.
    pub fn histogram_leaf(
        &self,
        metric: &str,
        daemon: Daemon,
        data_source: &str,
    ) -> Option<&HistogramLeaf> {
        self.histograms.iter().find_map(|(key, leaf)| {
            (key.metric == metric && key.daemon == daemon && key.data_source == data_source)
                .then_some(leaf)
        })
    }

    /// Counter leaf whose key matches `(metric, daemon)` and exactly the
    /// given `(dimension, value)` pairs.
    pub fn counter_leaf(
        &self,
        metric: &str,
        daemon: Daemon,
        labels: &[(Dimension, &str)],
    ) -> Option<f64> {
        self.counters.iter().find_map(|(key, value)| {
            let matches = key.metric == metric
                && key.daemon == daemon
                && key.labels.len() == labels.len()
                && key
                    .labels
                    .iter()
                    .zip(labels)
                    .all(|((d, v), (ed, ev))| d == ed && v == ev);
            matches.then_some(*value)
        })
    }
}
