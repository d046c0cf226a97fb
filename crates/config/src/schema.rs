use serde::{Deserialize, Serialize};
use std::time::Duration;
use vigil_core::{MetricKind, Result, Threshold, VigilError};
use vigil_timeseries::TimeWindow;

/// Root configuration structure parsed from `vigil.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VigilConfig {
    /// Sample retention and polling cadence.
    pub history: HistoryConfig,
    /// Where metrics come from.
    pub source: SourceConfig,
    /// Gauge warning / critical bands.
    pub thresholds: ThresholdConfig,
    /// Text report settings.
    pub render: RenderConfig,
}

impl VigilConfig {
    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.history.capacity == 0 {
            return Err(VigilError::Config("history.capacity must be greater than zero".into()));
        }
        if self.history.poll_interval_ms == 0 {
            return Err(VigilError::Config("history.poll_interval_ms must be greater than zero".into()));
        }
        for (name, t) in self.thresholds.named() {
            if t.warning > t.critical {
                return Err(VigilError::Config(format!(
                    "thresholds.{name}: warning ({}) exceeds critical ({})",
                    t.warning, t.critical
                )));
            }
        }
        Ok(())
    }
}

/// History retention settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Samples kept per metric before the oldest is evicted.
    pub capacity: usize,
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Look-back window used for trend summaries, e.g. `"5m"`.
    pub default_window: TimeWindow,
    /// Width of the chart downsampling buckets, in seconds.
    pub bucket_secs: u64,
}

impl HistoryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn bucket(&self) -> Duration {
        Duration::from_secs(self.bucket_secs)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity:         300,
            poll_interval_ms: 2_000,
            default_window:   TimeWindow::FiveMinutes,
            bucket_secs:      10,
        }
    }
}

/// Metric source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Identifier attached to every sample as the `source` attribute.
    pub id: String,
    /// RNG seed for the simulator; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Number of simulated servers contributing to the traffic balance.
    pub servers: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind:    SourceKind::System,
            id:      "localhost".to_string(),
            seed:    None,
            servers: 3,
        }
    }
}

/// Real host metrics or the random-walk simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    System,
    Simulated,
}

/// Per-gauge thresholds. Network applies to both directions and load to
/// all three averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub cpu: Threshold,
    pub memory: Threshold,
    pub disk: Threshold,
    pub network: Threshold,
    pub load: Threshold,
}

impl ThresholdConfig {
    pub fn for_metric(&self, kind: MetricKind) -> Threshold {
        match kind {
            MetricKind::Cpu => self.cpu,
            MetricKind::Memory => self.memory,
            MetricKind::Disk => self.disk,
            MetricKind::NetIn | MetricKind::NetOut => self.network,
            MetricKind::Load1m | MetricKind::Load5m | MetricKind::Load15m => self.load,
        }
    }

    fn named(&self) -> [(&'static str, Threshold); 5] {
        [
            ("cpu", self.cpu),
            ("memory", self.memory),
            ("disk", self.disk),
            ("network", self.network),
            ("load", self.load),
        ]
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu:     Threshold::new(60.0, 85.0),
            memory:  Threshold::new(70.0, 90.0),
            disk:    Threshold::new(75.0, 85.0),
            network: Threshold::new(50.0, 80.0),
            load:    Threshold::new(3.0, 5.0),
        }
    }
}

/// Text report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit a full report every N snapshots (0 disables reports).
    pub every_ticks: u32,
    /// Number of columns in each sparkline.
    pub sparkline_width: usize,
    /// Also log each series view as a JSON line.
    pub json: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            every_ticks:     5,
            sparkline_width: 30,
            json:            false,
        }
    }
}
