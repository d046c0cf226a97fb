use crate::sample::{MetricKind, Sample};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point-in-time snapshot of the metrics shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Milliseconds since the Unix epoch at which the snapshot was taken.
    pub timestamp: i64,
    /// Identifier of the source that produced the snapshot.
    pub source: String,
    /// Average CPU usage (0.0 – 100.0).
    pub cpu: f64,
    /// RAM usage (0.0 – 100.0).
    pub memory: f64,
    /// Root filesystem usage (0.0 – 100.0).
    pub disk: f64,
    /// Network receive rate in MB/s.
    pub net_in: f64,
    /// Network transmit rate in MB/s.
    pub net_out: f64,
    pub load_1m: f64,
    pub load_5m: f64,
    pub load_15m: f64,
    /// Per-server traffic in MB/s when the source covers a cluster; empty
    /// for a single host.
    #[serde(default)]
    pub server_traffic: Vec<f64>,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Cpu     => self.cpu,
            MetricKind::Memory  => self.memory,
            MetricKind::Disk    => self.disk,
            MetricKind::NetIn   => self.net_in,
            MetricKind::NetOut  => self.net_out,
            MetricKind::Load1m  => self.load_1m,
            MetricKind::Load5m  => self.load_5m,
            MetricKind::Load15m => self.load_15m,
        }
    }

    /// Traffic balance across the servers covered by this snapshot.
    #[must_use]
    pub fn load_balance(&self) -> LoadBalance {
        LoadBalance::from_traffic(&self.server_traffic)
    }

    /// One sample per metric, keyed by the metric name and tagged with the
    /// source id. All samples share the snapshot timestamp.
    pub fn samples(&self) -> impl Iterator<Item = (MetricKind, Sample)> + '_ {
        MetricKind::ALL.into_iter().map(move |kind| {
            let sample = Sample::new(self.timestamp, self.value(kind), kind.as_str())
                .with_attribute("source", self.source.clone());
            (kind, sample)
        })
    }
}

/// Warning / critical cut-offs for a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub warning: f64,
    pub critical: f64,
}

impl Threshold {
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }
}

/// Colour band of a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeLevel {
    Normal,
    Warning,
    Critical,
}

impl GaugeLevel {
    /// Both bounds are exclusive: a value equal to `critical` is `Warning`.
    #[must_use]
    pub fn classify(value: f64, threshold: Threshold) -> Self {
        if value > threshold.critical {
            GaugeLevel::Critical
        } else if value > threshold.warning {
            GaugeLevel::Warning
        } else {
            GaugeLevel::Normal
        }
    }
}

/// Overall system health derived from CPU, memory and 1-minute load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Good,
    Warning,
    Danger,
}

impl HealthStatus {
    #[must_use]
    pub fn evaluate(snapshot: &MetricsSnapshot) -> Self {
        let (cpu, mem, load) = (snapshot.cpu, snapshot.memory, snapshot.load_1m);
        if cpu < 85.0 && mem < 90.0 && load < 5.0 {
            HealthStatus::Good
        } else if cpu < 95.0 && mem < 95.0 && load < 7.0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Danger
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HealthStatus::Good    => "good",
            HealthStatus::Warning => "warning",
            HealthStatus::Danger  => "danger",
        })
    }
}

/// Traffic skew between the busiest and the quietest server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadBalance {
    pub ratio: f64,
    pub balanced: bool,
    pub server_count: usize,
}

impl LoadBalance {
    /// Skew at or above this ratio counts as unbalanced.
    pub const MAX_BALANCED_RATIO: f64 = 3.0;

    #[must_use]
    pub fn from_traffic(traffic: &[f64]) -> Self {
        let max = traffic.iter().copied().fold(f64::MIN, f64::max);
        let min = traffic.iter().copied().fold(f64::MAX, f64::min);
        let ratio = if traffic.is_empty() || min <= 0.0 { 1.0 } else { max / min };

        Self {
            ratio,
            balanced: ratio < Self::MAX_BALANCED_RATIO,
            server_count: traffic.len(),
        }
    }
}
