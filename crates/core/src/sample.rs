use crate::error::VigilError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Anything that can be ordered and deduplicated by a millisecond timestamp.
pub trait Timestamped {
    /// Milliseconds since the Unix epoch.
    fn timestamp_ms(&self) -> i64;
}

/// A single timestamped observation of a metric.
///
/// `series` and `attributes` are opaque to the history buffers: they are
/// stored and handed back exactly as they were pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the Unix epoch. Dedup and ordering key.
    pub timestamp: i64,
    /// The measured value (percentage, MB/s, load average…).
    pub value: f64,
    /// Logical series this sample belongs to, e.g. `"cpu"`.
    pub series: String,
    /// Free-form tags such as the source id, region or service type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64, series: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            series: series.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an opaque tag.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl Timestamped for Sample {
    fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }
}

/// The metrics tracked by the dashboard; each one gets its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
    NetIn,
    NetOut,
    #[serde(rename = "load_1m")]
    Load1m,
    #[serde(rename = "load_5m")]
    Load5m,
    #[serde(rename = "load_15m")]
    Load15m,
}

impl MetricKind {
    pub const ALL: [MetricKind; 8] = [
        MetricKind::Cpu,
        MetricKind::Memory,
        MetricKind::Disk,
        MetricKind::NetIn,
        MetricKind::NetOut,
        MetricKind::Load1m,
        MetricKind::Load5m,
        MetricKind::Load15m,
    ];

    /// Series key used for samples of this metric.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Cpu     => "cpu",
            MetricKind::Memory  => "memory",
            MetricKind::Disk    => "disk",
            MetricKind::NetIn   => "net_in",
            MetricKind::NetOut  => "net_out",
            MetricKind::Load1m  => "load_1m",
            MetricKind::Load5m  => "load_5m",
            MetricKind::Load15m => "load_15m",
        }
    }

    /// Display unit for gauges.
    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::Cpu | MetricKind::Memory | MetricKind::Disk => "%",
            MetricKind::NetIn | MetricKind::NetOut => " MB/s",
            MetricKind::Load1m | MetricKind::Load5m | MetricKind::Load15m => "",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| VigilError::Config(format!("unknown metric '{s}'")))
    }
}
