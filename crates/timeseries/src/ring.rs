use std::collections::HashMap;
use std::time::Duration;

use tracing::trace;
use vigil_core::{Result, Sample, Timestamped, VigilError};

/// Fixed-capacity, timestamp-deduplicated history of samples.
///
/// Samples are kept in insertion order. When the buffer is full the
/// oldest-inserted sample is evicted to make room; a sample whose timestamp
/// is already resident is dropped and the resident one is kept.
///
/// Out-of-order timestamps are stored where they arrive and are never
/// re-sorted, so dumps are chronological only if the producer is.
#[derive(Debug, Clone)]
pub struct TimeSeriesRingBuffer<T = Sample> {
    slots: Vec<Option<T>>,
    /// Slot of the oldest resident sample.
    head: usize,
    /// Slot the next sample is written to.
    tail: usize,
    count: usize,
    /// timestamp → slot, for O(1) duplicate detection.
    index: HashMap<i64, usize>,
}

impl<T: Timestamped + Clone> TimeSeriesRingBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(VigilError::Buffer("capacity must be greater than zero".into()));
        }

        Ok(Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
            index: HashMap::with_capacity(capacity),
        })
    }

    /// Push a sample, evicting the oldest if at capacity.
    ///
    /// Returns `false` (and leaves the buffer untouched) when a sample with
    /// the same timestamp is already resident.
    pub fn add(&mut self, sample: T) -> bool {
        let ts = sample.timestamp_ms();
        if self.index.contains_key(&ts) {
            trace!(ts, "duplicate timestamp ignored");
            return false;
        }

        let capacity = self.capacity();
        if self.count == capacity {
            // Full: head == tail, so the slot about to be written is the oldest.
            if let Some(evicted) = self.slots[self.head].take() {
                self.index.remove(&evicted.timestamp_ms());
            }
            self.head = (self.head + 1) % capacity;
        } else {
            self.count += 1;
        }

        self.slots[self.tail] = Some(sample);
        self.index.insert(ts, self.tail);
        self.tail = (self.tail + 1) % capacity;
        true
    }

    /// All resident samples, oldest first.
    #[must_use]
    pub fn get_all(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Samples no older than `window` before the current wall-clock time.
    #[must_use]
    pub fn get_by_time_range(&self, window: Duration) -> Vec<T> {
        self.get_by_time_range_at(window, crate::now_ms())
    }

    /// Samples with `timestamp >= now_ms - window`, in buffer order.
    #[must_use]
    pub fn get_by_time_range_at(&self, window: Duration, now_ms: i64) -> Vec<T> {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        let cutoff = now_ms.saturating_sub(window_ms);
        self.iter()
            .filter(|s| s.timestamp_ms() >= cutoff)
            .cloned()
            .collect()
    }

    /// Empty the buffer. Previously returned vectors are unaffected.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.index.clear();
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Resident samples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.count).filter_map(move |i| self.slots[(self.head + i) % capacity].as_ref())
    }

    /// The resident sample with exactly this timestamp.
    #[must_use]
    pub fn get(&self, timestamp: i64) -> Option<&T> {
        self.index
            .get(&timestamp)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    #[must_use]
    pub fn contains(&self, timestamp: i64) -> bool {
        self.index.contains_key(&timestamp)
    }

    /// Most recently inserted sample.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.capacity();
        self.slots[(self.tail + capacity - 1) % capacity].as_ref()
    }

    /// Oldest resident sample (next to be evicted).
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60_000;

    fn sample(ts: i64, value: f64) -> Sample {
        Sample::new(ts, value, "cpu")
    }

    fn pairs(buf: &TimeSeriesRingBuffer) -> Vec<(i64, f64)> {
        buf.get_all().iter().map(|s| (s.timestamp, s.value)).collect()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            TimeSeriesRingBuffer::<Sample>::new(0),
            Err(VigilError::Buffer(_))
        ));
    }

    #[test]
    fn new_buffer_is_empty() {
        let buf = TimeSeriesRingBuffer::<Sample>::new(4).unwrap();
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert_eq!(buf.capacity(), 4);
        assert!(buf.get_all().is_empty());
        assert!(buf.latest().is_none());
        assert!(buf.oldest().is_none());
        assert!(buf.get_by_time_range_at(Duration::from_secs(300), 0).is_empty());
    }

    #[test]
    fn overflow_evicts_oldest_and_duplicates_are_ignored() {
        let mut buf = TimeSeriesRingBuffer::new(3).unwrap();
        for (ts, v) in [(1, 10.0), (2, 20.0), (3, 30.0), (4, 40.0)] {
            assert!(buf.add(sample(ts, v)));
        }
        assert_eq!(pairs(&buf), vec![(2, 20.0), (3, 30.0), (4, 40.0)]);

        assert!(!buf.add(sample(4, 99.0)));
        assert_eq!(pairs(&buf), vec![(2, 20.0), (3, 30.0), (4, 40.0)]);
    }

    #[test]
    fn duplicate_keeps_first_value() {
        let mut buf = TimeSeriesRingBuffer::new(8).unwrap();
        buf.add(sample(5, 1.0));
        buf.add(sample(5, 2.0));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.get(5).map(|s| s.value), Some(1.0));
    }

    #[test]
    fn evicted_timestamp_can_return() {
        let mut buf = TimeSeriesRingBuffer::new(2).unwrap();
        buf.add(sample(1, 1.0));
        buf.add(sample(2, 2.0));
        buf.add(sample(3, 3.0));
        assert!(!buf.contains(1));
        assert!(buf.add(sample(1, 9.0)));
        assert_eq!(pairs(&buf), vec![(3, 3.0), (1, 9.0)]);
    }

    #[test]
    fn wraps_around_many_times() {
        let mut buf = TimeSeriesRingBuffer::new(5).unwrap();
        for ts in 0..103 {
            buf.add(sample(ts, ts as f64));
        }
        let got: Vec<i64> = buf.iter().map(|s| s.timestamp).collect();
        assert_eq!(got, vec![98, 99, 100, 101, 102]);
        assert_eq!(buf.oldest().map(|s| s.timestamp), Some(98));
        assert_eq!(buf.latest().map(|s| s.timestamp), Some(102));
        assert!(buf.is_full());
    }

    #[test]
    fn out_of_order_input_is_not_resorted() {
        let mut buf = TimeSeriesRingBuffer::new(4).unwrap();
        for ts in [30, 10, 20] {
            buf.add(sample(ts, 0.0));
        }
        let got: Vec<i64> = buf.iter().map(|s| s.timestamp).collect();
        assert_eq!(got, vec![30, 10, 20]);
    }

    #[test]
    fn range_query_keeps_recent_samples() {
        let t = 100 * MINUTE;
        let mut buf = TimeSeriesRingBuffer::new(10).unwrap();
        for ts in [t - 10 * MINUTE, t - 4 * MINUTE, t - MINUTE, t] {
            buf.add(sample(ts, 1.0));
        }
        let got: Vec<i64> = buf
            .get_by_time_range_at(Duration::from_secs(300), t)
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(got, vec![t - 4 * MINUTE, t - MINUTE, t]);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut buf = TimeSeriesRingBuffer::new(4).unwrap();
        buf.add(sample(1_000, 1.0));
        assert_eq!(buf.get_by_time_range_at(Duration::from_secs(1), 2_000).len(), 1);
        assert!(buf.get_by_time_range_at(Duration::from_millis(999), 2_000).is_empty());
    }

    #[test]
    fn range_against_wall_clock() {
        let mut buf = TimeSeriesRingBuffer::new(4).unwrap();
        let now = crate::now_ms();
        buf.add(sample(now - 20 * MINUTE, 1.0));
        buf.add(sample(now, 2.0));
        let recent = buf.get_by_time_range(Duration::from_secs(300));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].value, 2.0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut buf = TimeSeriesRingBuffer::new(2).unwrap();
        buf.add(sample(1, 1.0));
        buf.add(sample(2, 2.0));
        let before = buf.get_all();

        buf.clear();
        assert!(buf.get_all().is_empty());
        assert!(!buf.contains(1));
        assert_eq!(before.len(), 2);

        assert!(buf.add(sample(1, 5.0)));
        assert_eq!(pairs(&buf), vec![(1, 5.0)]);
    }

    #[test]
    fn payload_is_preserved() {
        let mut buf = TimeSeriesRingBuffer::new(2).unwrap();
        let s = Sample::new(7, 0.5, "disk")
            .with_attribute("server", "srv-3")
            .with_attribute("region", "north");
        buf.add(s.clone());
        assert_eq!(buf.get_all(), vec![s]);
    }
}
