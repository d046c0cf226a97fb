pub mod error;
pub mod event;
pub mod sample;
pub mod state;

pub use error::{Result, VigilError};
pub use event::Message;
pub use sample::{MetricKind, Sample, Timestamped};
pub use state::{GaugeLevel, HealthStatus, LoadBalance, MetricsSnapshot, Threshold};
