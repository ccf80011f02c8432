//! Collector state tests driven by recorded Druid datapoints.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde_json::{json, Value};

use druidscope_core::collector::{Collector, DEFAULT_DATA_SOURCE};
use druidscope_core::registry::{Daemon, Dimension};

const ALL: &[Daemon] = &[Daemon::Coordinator, Daemon::Historical, Daemon::Broker];

fn load(name: &str) -> Value {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

fn collector() -> Collector {
    Collector::new(ALL.to_vec())
}

#[test]
fn histogram_buckets_accumulate() {
    let collector = collector();
    let mut record = load("query_time_historical.json");

    collector.ingest(&record);
    let snap = collector.snapshot();
    let leaf = snap
        .histogram_leaf("query/time", Daemon::Historical, "test")
        .unwrap();
    assert_eq!(leaf.buckets, [0, 1, 1, 1, 1, 1]);
    assert_eq!(leaf.sum, 42.0);

    // A second observation of 5 lands in every bucket.
    record["value"] = json!(5);
    collector.ingest(&record);
    let snap = collector.snapshot();
    let leaf = snap
        .histogram_leaf("query/time", Daemon::Historical, "test")
        .unwrap();
    assert_eq!(leaf.buckets, [1, 2, 2, 2, 2, 2]);
    assert_eq!(leaf.sum, 47.0);
    assert_eq!(leaf.count(), 2);
}

#[test]
fn histogram_leaves_split_by_datasource_and_daemon() {
    let collector = collector();
    let mut record = load("query_time_historical.json");
    collector.ingest(&record);

    record["dataSource"] = json!("test2");
    record["value"] = json!(5);
    collector.ingest(&record);

    record["service"] = json!("druid/broker");
    collector.ingest(&record);

    let snap = collector.snapshot();
    assert_eq!(snap.histograms.len(), 3);
    let second = snap
        .histogram_leaf("query/time", Daemon::Historical, "test2")
        .unwrap();
    assert_eq!(second.buckets, [1, 1, 1, 1, 1, 1]);
    assert_eq!(second.sum, 5.0);
    assert!(snap
        .histogram_leaf("query/time", Daemon::Broker, "test2")
        .is_some());
    // The first leaf is untouched by its neighbors.
    let first = snap
        .histogram_leaf("query/time", Daemon::Historical, "test")
        .unwrap();
    assert_eq!(first.buckets, [0, 1, 1, 1, 1, 1]);
}

#[test]
fn histogram_without_datasource_uses_the_sentinel() {
    let collector = collector();
    let mut record = load("query_time_historical.json");
    record.as_object_mut().unwrap().remove("dataSource");
    collector.ingest(&record);

    let snap = collector.snapshot();
    assert!(snap
        .histogram_leaf("query/time", Daemon::Historical, DEFAULT_DATA_SOURCE)
        .is_some());
}

#[test]
fn counter_leaves_are_last_write_wins() {
    let collector = collector();
    let mut record = load("segment_used_historical.json");
    collector.ingest(&record);

    let labels = [
        (Dimension::Tier, "_default_tier"),
        (Dimension::DataSource, "test"),
    ];
    let snap = collector.snapshot();
    assert_eq!(
        snap.counter_leaf("segment/used", Daemon::Historical, &labels),
        Some(42.0)
    );

    // Same path again: replace, never accumulate.
    record["value"] = json!(11);
    collector.ingest(&record);
    let snap = collector.snapshot();
    assert_eq!(
        snap.counter_leaf("segment/used", Daemon::Historical, &labels),
        Some(11.0)
    );
    assert_eq!(snap.counters.len(), 1);

    // A different datasource is its own leaf.
    record["dataSource"] = json!("test2");
    record["value"] = json!(543);
    collector.ingest(&record);
    let snap = collector.snapshot();
    assert_eq!(snap.counters.len(), 2);
    assert_eq!(
        snap.counter_leaf(
            "segment/used",
            Daemon::Historical,
            &[
                (Dimension::Tier, "_default_tier"),
                (Dimension::DataSource, "test2"),
            ],
        ),
        Some(543.0)
    );
}

#[test]
fn declared_dimensions_win_over_record_contents() {
    // A historical cache eviction count carries a dataSource, but the
    // registry declares no dimensions for it: the leaf stores label-less.
    let collector = collector();
    let record = json!({
        "feed": "metrics", "service": "druid/historical", "dataSource": "test",
        "metric": "query/cache/total/evictions", "value": 142
    });
    collector.ingest(&record);

    let snap = collector.snapshot();
    assert_eq!(
        snap.counter_leaf("query/cache/total/evictions", Daemon::Historical, &[]),
        Some(142.0)
    );
}

#[test]
fn absent_declared_dimension_is_omitted_from_the_path() {
    let collector = collector();
    let record = json!({
        "feed": "metrics", "service": "druid/historical", "dataSource": "test",
        "metric": "segment/used", "value": 42
    });
    collector.ingest(&record);

    let snap = collector.snapshot();
    assert_eq!(
        snap.counter_leaf(
            "segment/used",
            Daemon::Historical,
            &[(Dimension::DataSource, "test")],
        ),
        Some(42.0)
    );
}

#[test]
fn registration_counter_counts_every_ingest_call() {
    let collector = collector();
    collector.ingest(&load("query_time_historical.json"));
    collector.ingest(&json!({"feed": "metrics", "service": "druid/historical",
                             "metric": "jvm/gc/time", "value": 1}));
    collector.ingest(&json!("not even an object"));
    collector.ingest(&json!({}));

    assert_eq!(collector.datapoints_registered(), 4);

    // Only the recognized datapoint left a trace in the state.
    let snap = collector.snapshot();
    assert_eq!(snap.histograms.len(), 1);
    assert!(snap.counters.is_empty());
    assert_eq!(snap.datapoints_registered, 4);
}

#[test]
fn disabled_daemons_are_dropped() {
    let collector = Collector::new(vec![Daemon::Coordinator]);
    assert_eq!(collector.enabled_daemons(), &[Daemon::Coordinator]);

    collector.ingest(&load("query_time_historical.json"));

    assert_eq!(collector.datapoints_registered(), 1);
    assert!(collector.snapshot().histograms.is_empty());
}

#[test]
fn batch_of_recorded_datapoints_all_land() {
    let collector = collector();
    let batch = load("datapoint_batch.json");
    let records = batch.as_array().unwrap();
    for record in records {
        collector.ingest(record);
    }

    assert_eq!(collector.datapoints_registered(), records.len() as u64);

    let snap = collector.snapshot();
    // 4 histogram datapoints across distinct (metric, daemon, datasource)
    // leaves, the rest are counters.
    assert_eq!(snap.histograms.len(), 4);
    assert_eq!(snap.counters.len(), records.len() - 4);
}
