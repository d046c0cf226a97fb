use std::collections::VecDeque;
use std::time::Duration;

use proptest::prelude::*;
use vigil_core::Sample;
use vigil_timeseries::{slider_instant, TimeSeriesRingBuffer, TimeWindow};

#[derive(Debug, Clone)]
enum Op {
    Add(i64, f64),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        20 => (0i64..64, -100.0f64..100.0).prop_map(|(ts, v)| Op::Add(ts, v)),
        1 => Just(Op::Clear),
    ]
}

/// Straightforward reference: scan for duplicates, pop the front when full.
fn model_add(model: &mut VecDeque<(i64, f64)>, capacity: usize, ts: i64, v: f64) {
    if model.iter().any(|&(t, _)| t == ts) {
        return;
    }
    if model.len() == capacity {
        model.pop_front();
    }
    model.push_back((ts, v));
}

fn dump(buf: &TimeSeriesRingBuffer) -> Vec<(i64, f64)> {
    buf.get_all().iter().map(|s| (s.timestamp, s.value)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn matches_reference_model(
        capacity in 1usize..12,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mut buf = TimeSeriesRingBuffer::new(capacity).unwrap();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                Op::Add(ts, v) => {
                    let accepted = buf.add(Sample::new(ts, v, "cpu"));
                    let was_resident = model.iter().any(|&(t, _)| t == ts);
                    prop_assert_eq!(accepted, !was_resident);
                    model_add(&mut model, capacity, ts, v);
                }
                Op::Clear => {
                    buf.clear();
                    model.clear();
                }
            }
            prop_assert!(buf.len() <= capacity);
            prop_assert_eq!(dump(&buf), model.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn never_holds_duplicate_timestamps(
        capacity in 1usize..16,
        stamps in prop::collection::vec(0i64..20, 0..100),
    ) {
        let mut buf = TimeSeriesRingBuffer::new(capacity).unwrap();
        for ts in stamps {
            buf.add(Sample::new(ts, 0.0, "cpu"));
        }
        let mut seen: Vec<i64> = buf.iter().map(|s| s.timestamp).collect();
        let n = seen.len();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), n);
    }

    #[test]
    fn fifo_keeps_last_capacity_samples(capacity in 1usize..32, extra in 0usize..64) {
        let mut buf = TimeSeriesRingBuffer::new(capacity).unwrap();
        let total = capacity + extra;
        for ts in 0..total as i64 {
            buf.add(Sample::new(ts, ts as f64, "cpu"));
        }
        let kept: Vec<i64> = buf.iter().map(|s| s.timestamp).collect();
        let expected: Vec<i64> = (extra as i64..total as i64).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn non_decreasing_input_dumps_sorted(
        capacity in 1usize..32,
        gaps in prop::collection::vec(0i64..5_000, 0..100),
    ) {
        let mut buf = TimeSeriesRingBuffer::new(capacity).unwrap();
        let mut ts = 0;
        for gap in gaps {
            ts += gap;
            buf.add(Sample::new(ts, 1.0, "cpu"));
        }
        let all = buf.get_all();
        prop_assert!(all.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn range_query_is_a_suffix_filter(
        gaps in prop::collection::vec(1i64..60_000, 1..80),
        window_secs in 1u64..1_200,
    ) {
        let mut buf = TimeSeriesRingBuffer::new(64).unwrap();
        let mut ts = 0;
        for gap in gaps {
            ts += gap;
            buf.add(Sample::new(ts, 0.0, "cpu"));
        }
        let now = ts;
        let window = Duration::from_secs(window_secs);
        let cutoff = now - window_secs as i64 * 1_000;

        let got = buf.get_by_time_range_at(window, now);
        let expected: Vec<_> = buf.get_all().into_iter().filter(|s| s.timestamp >= cutoff).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn slider_stays_inside_window(position in 0u8..=255, now in 0i64..10_000_000_000, secs in 1u64..100_000) {
        let window = TimeWindow::Custom(Duration::from_secs(secs));
        let at = slider_instant(position, window, now);
        prop_assert!(at <= now);
        prop_assert!(at >= now - secs as i64 * 1_000);
    }
}

#[test]
fn range_query_scenario() {
    const MINUTE: i64 = 60_000;
    let t = 1_700_000_000_000;
    let mut buf = TimeSeriesRingBuffer::new(8).unwrap();
    for ts in [t - 10 * MINUTE, t - 4 * MINUTE, t - MINUTE, t] {
        buf.add(Sample::new(ts, 1.0, "cpu"));
    }
    let got: Vec<i64> = buf
        .get_by_time_range_at(TimeWindow::FiveMinutes.duration(), t)
        .iter()
        .map(|s| s.timestamp)
        .collect();
    assert_eq!(got, vec![t - 4 * MINUTE, t - MINUTE, t]);
}
