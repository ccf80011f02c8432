//! Prometheus text exposition rendering.
//!
//! Pure function of a [`Snapshot`]: walks the registry in declaration order
//! and emits one family per `(metric, daemon)` pair. Dimension-less families
//! with no data render a single `NaN` sample so the series always exists;
//! dimensioned families with no data render nothing, since the label values
//! themselves are unknown. Each leaf renders independently, so unevenly
//! populated state can never fail the render pass.

use std::fmt::Write;

use crate::collector::{Snapshot, BUCKET_BOUNDS, BUCKET_COUNT};
use crate::registry::{Daemon, EmptyPolicy, MetricKind, MetricSpec, REGISTRY};

/// Content type of the text exposition format.
pub const TEXT_EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Escape a label value per the exposition format.
pub fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Render a snapshot into exposition text.
pub fn render(snap: &Snapshot) -> String {
    let mut out = String::new();
    for spec in REGISTRY {
        for &daemon in spec.daemons {
            if !snap.enabled.contains(&daemon) {
                continue;
            }
            let name = spec.rendered_name(daemon);
            match spec.kind {
                MetricKind::Histogram => render_histogram(snap, spec, daemon, &name, &mut out),
                MetricKind::Counter => render_counter(snap, spec, daemon, &name, &mut out),
            }
        }
    }

    let _ = writeln!(
        out,
        "# HELP druid_exporter_datapoints_registered_count Datapoints pushed to the exporter, recognized or not"
    );
    let _ = writeln!(out, "# TYPE druid_exporter_datapoints_registered_count counter");
    let _ = writeln!(
        out,
        "druid_exporter_datapoints_registered_count {}",
        snap.datapoints_registered
    );
    out
}

fn header(out: &mut String, name: &str, spec: &MetricSpec, prom_type: &str) {
    let _ = writeln!(out, "# HELP {name} {}", spec.help);
    let _ = writeln!(out, "# TYPE {name} {prom_type}");
}

fn render_histogram(snap: &Snapshot, spec: &MetricSpec, daemon: Daemon, name: &str, out: &mut String) {
    let leaves: Vec<_> = snap
        .histograms
        .iter()
        .filter(|(key, _)| key.metric == spec.event_name && key.daemon == daemon)
        .collect();
    if leaves.is_empty() {
        // Histogram families are datasource-labeled; nothing to synthesize.
        return;
    }

    header(out, name, spec, "histogram");
    for (key, leaf) in leaves {
        let ds = escape_label(&key.data_source);
        for (i, bound) in BUCKET_BOUNDS.iter().enumerate() {
            let _ = writeln!(
                out,
                "{name}_bucket{{datasource=\"{ds}\",le=\"{bound}\"}} {}",
                leaf.buckets[i]
            );
        }
        let _ = writeln!(
            out,
            "{name}_bucket{{datasource=\"{ds}\",le=\"+Inf\"}} {}",
            leaf.buckets[BUCKET_COUNT - 1]
        );
        let _ = writeln!(out, "{name}_sum{{datasource=\"{ds}\"}} {}", leaf.sum);
        let _ = writeln!(out, "{name}_count{{datasource=\"{ds}\"}} {}", leaf.count());
    }
}

fn render_counter(snap: &Snapshot, spec: &MetricSpec, daemon: Daemon, name: &str, out: &mut String) {
    let leaves: Vec<_> = snap
        .counters
        .iter()
        .filter(|(key, _)| key.metric == spec.event_name && key.daemon == daemon)
        .collect();

    if spec.empty_policy == EmptyPolicy::RenderNan {
        // Dimension-less series always exist, NaN until the first datapoint.
        header(out, name, spec, "gauge");
        let value = leaves.first().map_or(f64::NAN, |(_, value)| **value);
        let _ = writeln!(out, "{name} {value}");
        return;
    }

    if leaves.is_empty() {
        return;
    }
    header(out, name, spec, "gauge");
    for (key, value) in leaves {
        let labels: Vec<String> = key
            .labels
            .iter()
            .map(|(dim, v)| format!("{}=\"{}\"", dim.label(), escape_label(v)))
            .collect();
        if labels.is_empty() {
            // Declared dimensions that were all absent from the record.
            let _ = writeln!(out, "{name} {value}");
        } else {
            let _ = writeln!(out, "{name}{{{}}} {value}", labels.join(","));
        }
    }
}
