use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vigil_core::VigilError;

/// Look-back window for chart queries, measured back from "now".
///
/// Serialised as its short form (`"5m"`, `"90s"`, `"2h"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeWindow {
    #[default]
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    Custom(Duration),
}

impl TimeWindow {
    /// Presets offered by the time-range selector.
    pub const PRESETS: [TimeWindow; 3] = [
        TimeWindow::FiveMinutes,
        TimeWindow::TenMinutes,
        TimeWindow::FifteenMinutes,
    ];

    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            TimeWindow::FiveMinutes    => Duration::from_secs(5 * 60),
            TimeWindow::TenMinutes     => Duration::from_secs(10 * 60),
            TimeWindow::FifteenMinutes => Duration::from_secs(15 * 60),
            TimeWindow::Custom(d)      => d,
        }
    }

    fn from_duration(d: Duration) -> Self {
        match d.as_secs() {
            300 if d.subsec_nanos() == 0 => TimeWindow::FiveMinutes,
            600 if d.subsec_nanos() == 0 => TimeWindow::TenMinutes,
            900 if d.subsec_nanos() == 0 => TimeWindow::FifteenMinutes,
            _ => TimeWindow::Custom(d),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.duration().as_secs();
        if secs % 3600 == 0 && secs > 0 {
            write!(f, "{}h", secs / 3600)
        } else if secs % 60 == 0 && secs > 0 {
            write!(f, "{}m", secs / 60)
        } else {
            write!(f, "{secs}s")
        }
    }
}

impl FromStr for TimeWindow {
    type Err = VigilError;

    /// Accepts `<n>s`, `<n>m` or `<n>h` with a positive integer `n`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || VigilError::Config(format!("invalid time window '{s}'"));

        let (split, _) = s.char_indices().last().ok_or_else(invalid)?;
        let (digits, unit) = s.split_at(split);
        let n: u64 = digits.parse().map_err(|_| invalid())?;
        if n == 0 {
            return Err(invalid());
        }

        let secs = match unit {
            "s" => n,
            "m" => n.checked_mul(60).ok_or_else(invalid)?,
            "h" => n.checked_mul(3600).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        Ok(TimeWindow::from_duration(Duration::from_secs(secs)))
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = VigilError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeWindow> for String {
    fn from(window: TimeWindow) -> Self {
        window.to_string()
    }
}

/// Map a 0–100 slider position onto an instant inside the window.
///
/// 100 is `now_ms`, 0 is `now_ms - window`; positions above 100 clamp.
#[must_use]
pub fn slider_instant(position: u8, window: TimeWindow, now_ms: i64) -> i64 {
    let position = i128::from(position.min(100));
    let window_ms = window.duration().as_millis() as i128;
    let back = window_ms * (100 - position) / 100;
    (i128::from(now_ms) - back).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
