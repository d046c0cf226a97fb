use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use vigil_core::{Result, Sample, Timestamped};

use crate::ring::TimeSeriesRingBuffer;

/// Cloneable handle to a ring buffer shared between a producer and readers.
///
/// Every method holds the lock for the whole operation, so a reader never
/// sees an eviction half-applied.
#[derive(Debug)]
pub struct SharedBuffer<T = Sample> {
    inner: Arc<Mutex<TimeSeriesRingBuffer<T>>>,
}

impl<T> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Timestamped + Clone> SharedBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(TimeSeriesRingBuffer::new(capacity)?)),
        })
    }

    pub fn add(&self, sample: T) -> bool {
        self.inner.lock().add(sample)
    }

    #[must_use]
    pub fn get_all(&self) -> Vec<T> {
        self.inner.lock().get_all()
    }

    #[must_use]
    pub fn get_by_time_range(&self, window: Duration) -> Vec<T> {
        self.inner.lock().get_by_time_range(window)
    }

    #[must_use]
    pub fn get_by_time_range_at(&self, window: Duration, now_ms: i64) -> Vec<T> {
        self.inner.lock().get_by_time_range_at(window, now_ms)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.inner.lock().latest().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}
