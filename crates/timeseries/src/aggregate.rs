use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use vigil_core::Sample;

/// Summary statistics over a slice of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Value of the last sample in slice order.
    pub latest: f64,
}

impl Aggregate {
    #[must_use]
    pub fn of(samples: &[Sample]) -> Option<Self> {
        let last = samples.last()?;
        let (min, max, sum) = samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), s| (min.min(s.value), max.max(s.value), sum + s.value),
        );

        Some(Self {
            count: samples.len(),
            min,
            max,
            mean: sum / samples.len() as f64,
            latest: last.value,
        })
    }
}

/// Downsample into fixed-width buckets aligned to multiples of `bucket`.
///
/// Returns `(bucket_start_ms, mean)` pairs in ascending bucket order.
/// A zero-width bucket returns every sample as its own point.
#[must_use]
pub fn bucket_means(samples: &[Sample], bucket: Duration) -> Vec<(i64, f64)> {
    let width = i64::try_from(bucket.as_millis()).unwrap_or(i64::MAX);
    if width == 0 {
        let mut points: Vec<_> = samples.iter().map(|s| (s.timestamp, s.value)).collect();
        points.sort_by_key(|&(ts, _)| ts);
        return points;
    }

    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for s in samples {
        let start = s.timestamp.div_euclid(width) * width;
        let slot = buckets.entry(start).or_insert((0.0, 0));
        slot.0 += s.value;
        slot.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(start, (sum, n))| (start, sum / n as f64))
        .collect()
}

/// Split a mixed slice into per-series vectors, keeping relative order.
#[must_use]
pub fn group_by_series(samples: &[Sample]) -> BTreeMap<String, Vec<Sample>> {
    let mut groups: BTreeMap<String, Vec<Sample>> = BTreeMap::new();
    for s in samples {
        groups.entry(s.series.clone()).or_default().push(s.clone());
    }
    groups
}

/// Vertical scale for a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartScale {
    pub min: f64,
    pub max: f64,
}

impl ChartScale {
    #[must_use]
    pub fn fit(samples: &[Sample]) -> Option<Self> {
        Aggregate::of(samples).map(|a| Self { min: a.min, max: a.max })
    }

    /// Flat series get a range of 1 so they draw along the baseline.
    #[must_use]
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 { 1.0 } else { range }
    }

    /// Position of `value` in `[0, 1]`, 0 being the minimum.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / self.range()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(ts: i64, value: f64) -> Sample {
        Sample::new(ts, value, "cpu")
    }

    #[test]
    fn aggregate_of_empty_is_none() {
        assert!(Aggregate::of(&[]).is_none());
        assert!(ChartScale::fit(&[]).is_none());
    }

    #[test]
    fn aggregate_stats() {
        let a = Aggregate::of(&[s(1, 4.0), s(2, 1.0), s(3, 7.0)]).unwrap();
        assert_eq!(a.count, 3);
        assert_eq!(a.min, 1.0);
        assert_eq!(a.max, 7.0);
        assert_eq!(a.mean, 4.0);
        assert_eq!(a.latest, 7.0);
    }

    #[test]
    fn buckets_average_and_align() {
        let samples = [s(1_000, 2.0), s(9_999, 4.0), s(10_000, 10.0), s(25_000, 1.0)];
        let points = bucket_means(&samples, Duration::from_secs(10));
        assert_eq!(points, vec![(0, 3.0), (10_000, 10.0), (20_000, 1.0)]);
    }

    #[test]
    fn zero_bucket_keeps_every_point() {
        let samples = [s(3, 1.0), s(1, 2.0)];
        assert_eq!(bucket_means(&samples, Duration::ZERO), vec![(1, 2.0), (3, 1.0)]);
    }

    #[test]
    fn grouping_by_series() {
        let samples = [
            s(1, 1.0),
            Sample::new(1, 50.0, "memory"),
            s(2, 2.0),
        ];
        let groups = group_by_series(&samples);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["cpu"].len(), 2);
        assert_eq!(groups["memory"][0].value, 50.0);
    }

    #[test]
    fn flat_series_scale() {
        let scale = ChartScale::fit(&[s(1, 5.0), s(2, 5.0)]).unwrap();
        assert_eq!(scale.range(), 1.0);
        assert_eq!(scale.normalize(5.0), 0.0);

        let scale = ChartScale::fit(&[s(1, 10.0), s(2, 20.0)]).unwrap();
        assert_eq!(scale.normalize(15.0), 0.5);
        assert_eq!(scale.normalize(30.0), 1.0);
    }
}
