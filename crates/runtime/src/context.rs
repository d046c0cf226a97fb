use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use vigil_config::{ThresholdConfig, VigilConfig};
use vigil_core::{
    GaugeLevel, HealthStatus, LoadBalance, MetricKind, MetricsSnapshot, Result, Sample,
};
use vigil_timeseries::{bucket_means, slider_instant, Aggregate, ChartScale, SharedBuffer, TimeWindow};

/// Everything the dashboard knows: one bounded history per metric, the most
/// recent snapshot and the display settings currently in force.
///
/// Built once per session and passed explicitly to the polling loop and the
/// renderer.
#[derive(Debug)]
pub struct DashboardContext {
    history: BTreeMap<MetricKind, SharedBuffer>,
    latest: Option<MetricsSnapshot>,
    thresholds: ThresholdConfig,
    window: TimeWindow,
    bucket: Duration,
    capacity: usize,
}

/// Current reading of one metric with its colour band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gauge {
    pub metric: MetricKind,
    pub value: f64,
    pub level: GaugeLevel,
}

/// A metric's history sliced to a look-back window, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub metric: MetricKind,
    pub window: TimeWindow,
    pub samples: Vec<Sample>,
    pub aggregate: Option<Aggregate>,
    pub scale: Option<ChartScale>,
    /// `(bucket_start_ms, mean)` downsampled points.
    pub points: Vec<(i64, f64)>,
}

impl DashboardContext {
    pub fn new(config: &VigilConfig) -> Result<Self> {
        let capacity = config.history.capacity;
        let history = MetricKind::ALL
            .into_iter()
            .map(|kind| SharedBuffer::new(capacity).map(|buf| (kind, buf)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self {
            history,
            latest: None,
            thresholds: config.thresholds.clone(),
            window: config.history.default_window,
            bucket: config.history.bucket(),
            capacity,
        })
    }

    /// Record a snapshot. Returns how many samples were accepted; a
    /// snapshot whose timestamp is already resident contributes none.
    pub fn ingest(&mut self, snapshot: MetricsSnapshot) -> usize {
        let accepted = snapshot
            .samples()
            .filter(|(kind, sample)| self.history[kind].add(sample.clone()))
            .count();

        if accepted == 0 {
            debug!(ts = snapshot.timestamp, "snapshot already recorded");
        } else {
            self.latest = Some(snapshot);
        }
        accepted
    }

    /// Shared handle to a metric's history, e.g. for a renderer task.
    #[must_use]
    pub fn series(&self, kind: MetricKind) -> SharedBuffer {
        self.history[&kind].clone()
    }

    #[must_use]
    pub fn window_view(&self, kind: MetricKind, window: TimeWindow, now_ms: i64) -> SeriesView {
        let samples = self.history[&kind].get_by_time_range_at(window.duration(), now_ms);
        SeriesView {
            metric: kind,
            window,
            aggregate: Aggregate::of(&samples),
            scale: ChartScale::fit(&samples),
            points: bucket_means(&samples, self.bucket),
            samples,
        }
    }

    /// The sample a 0–100 time slider points at: the last one at or before
    /// the slider instant, or the earliest in the window if none precede it.
    #[must_use]
    pub fn value_at(&self, kind: MetricKind, position: u8, now_ms: i64) -> Option<Sample> {
        let at = slider_instant(position, self.window, now_ms);
        let samples = self.history[&kind].get_by_time_range_at(self.window.duration(), now_ms);
        samples
            .iter()
            .rev()
            .find(|s| s.timestamp <= at)
            .or_else(|| samples.first())
            .cloned()
    }

    /// Gauges for the latest snapshot, in metric order.
    #[must_use]
    pub fn gauges(&self) -> Vec<Gauge> {
        let Some(snapshot) = &self.latest else {
            return Vec::new();
        };
        MetricKind::ALL
            .into_iter()
            .map(|metric| {
                let value = snapshot.value(metric);
                Gauge {
                    metric,
                    value,
                    level: GaugeLevel::classify(value, self.thresholds.for_metric(metric)),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn health(&self) -> Option<HealthStatus> {
        self.latest.as_ref().map(HealthStatus::evaluate)
    }

    /// `None` until a snapshot covering more than one server arrives.
    #[must_use]
    pub fn load_balance(&self) -> Option<LoadBalance> {
        self.latest
            .as_ref()
            .filter(|s| !s.server_traffic.is_empty())
            .map(MetricsSnapshot::load_balance)
    }

    /// Drop all history and the latest snapshot.
    pub fn reset(&mut self) {
        self.history.values().for_each(SharedBuffer::clear);
        self.latest = None;
        info!("history cleared");
    }

    /// Pick up reloadable settings. History capacity is fixed for the
    /// session; a changed value only takes effect after a restart.
    pub fn apply_config(&mut self, config: &VigilConfig) {
        self.thresholds = config.thresholds.clone();
        self.window = config.history.default_window;
        self.bucket = config.history.bucket();

        if config.history.capacity != self.capacity {
            warn!(
                current = self.capacity,
                requested = config.history.capacity,
                "history capacity changes need a restart"
            );
        }
    }

    #[must_use]
    pub fn latest(&self) -> Option<&MetricsSnapshot> {
        self.latest.as_ref()
    }

    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
