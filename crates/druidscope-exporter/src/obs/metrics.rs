//! Minimal self-metrics for the exporter process.
//!
//! Counter vectors with dynamic labels backed by `DashMap`; labels are
//! flattened into sorted key vectors to keep deterministic rendering order.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use druidscope_core::render::escape_label;

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let labels = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (labels, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (labels, value) in rows {
            let _ = writeln!(out, "{name}{{{labels}}} {value}");
        }
    }
}

#[derive(Default)]
pub struct ExporterMetrics {
    /// Ingest POSTs by outcome (`ok` / `bad_json`).
    pub posts: CounterVec,
    /// Scrape requests served.
    pub scrapes: AtomicU64,
}

impl ExporterMetrics {
    pub fn record_scrape(&self) {
        self.scrapes.fetch_add(1, Ordering::Relaxed);
    }

    /// Render all self-metrics; appended after the collector output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.posts.render("druid_exporter_posts_total", &mut out);
        let _ = writeln!(out, "# TYPE druid_exporter_scrapes_total counter");
        let _ = writeln!(
            out,
            "druid_exporter_scrapes_total {}",
            self.scrapes.load(Ordering::Relaxed)
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_vec_renders_sorted_rows() {
        let metrics = ExporterMetrics::default();
        metrics.posts.inc(&[("result", "ok")]);
        metrics.posts.inc(&[("result", "ok")]);
        metrics.posts.inc(&[("result", "bad_json")]);
        metrics.record_scrape();

        let out = metrics.render();
        let bad = out.find("druid_exporter_posts_total{result=\"bad_json\"} 1");
        let ok = out.find("druid_exporter_posts_total{result=\"ok\"} 2");
        assert!(bad.is_some() && ok.is_some());
        assert!(bad < ok);
        assert!(out.contains("druid_exporter_scrapes_total 1"));
    }
}
