// Bounded FIFO history of telemetry samples
use std::collections::VecDeque;

use super::telemetry::TelemetrySample;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

/// Chronologically ordered samples, oldest first, never longer than `capacity`.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    samples: VecDeque<TelemetrySample>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append a sample, evicting the oldest entries once over capacity.
    pub fn append(&mut self, sample: TelemetrySample) {
        self.samples.push_back(sample);
        self.evict_overflow();
    }

    /// Change the retention limit; shrinking drops the oldest samples immediately.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict_overflow();
    }

    pub fn snapshot(&self) -> Vec<TelemetrySample> {
        self.samples.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    /// Widest sample currently retained. Samples narrow when the cell count is lowered.
    pub fn max_cell_count(&self) -> usize {
        self.samples
            .iter()
            .map(TelemetrySample::cell_count)
            .max()
            .unwrap_or(0)
    }

    fn evict_overflow(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }
}
