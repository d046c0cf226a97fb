pub mod host;
pub mod monitor;
pub mod simulator;

pub use host::SysinfoSource;
pub use monitor::{spawn_monitor, MonitorHandle};
pub use simulator::Simulator;

use vigil_core::{MetricsSnapshot, Result};

/// Anything that can produce a [`MetricsSnapshot`] on demand.
///
/// Sources are polled from the monitor task, one call per tick.
pub trait MetricSource: Send + 'static {
    /// Identifier attached to every snapshot, e.g. the host name.
    fn id(&self) -> &str;

    /// Take a snapshot stamped with `now_ms`.
    fn sample(&mut self, now_ms: i64) -> Result<MetricsSnapshot>;
}

impl MetricSource for Box<dyn MetricSource> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn sample(&mut self, now_ms: i64) -> Result<MetricsSnapshot> {
        (**self).sample(now_ms)
    }
}
