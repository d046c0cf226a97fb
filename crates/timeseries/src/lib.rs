//! Bounded sample history and the window math used to slice it for charts.

pub mod aggregate;
pub mod ring;
pub mod shared;
pub mod window;

pub use aggregate::{bucket_means, group_by_series, Aggregate, ChartScale};
pub use ring::TimeSeriesRingBuffer;
pub use shared::SharedBuffer;
pub use window::{slider_instant, TimeWindow};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
