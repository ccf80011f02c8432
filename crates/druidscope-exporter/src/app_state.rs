//! Shared application state for the druidscope exporter.

use std::sync::Arc;

use druidscope_core::collector::Collector;
use druidscope_core::error::Result;
use druidscope_core::registry;

use crate::config::ExporterConfig;
use crate::obs::metrics::ExporterMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    collector: Collector,
    metrics: ExporterMetrics,
}

impl AppState {
    /// Build application state. Registry defects surface here, at startup,
    /// never at ingest time.
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        registry::validate()?;
        let collector = Collector::new(cfg.enabled_daemons());
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                collector,
                metrics: ExporterMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn collector(&self) -> &Collector {
        &self.inner.collector
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.inner.metrics
    }
}
