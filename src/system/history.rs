use std::collections::VecDeque;

use crate::system::rate::{RateSample, TrackedField};

/// Fixed-capacity ring buffer of the most recent rate samples, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    capacity: usize,
    samples: VecDeque<RateSample>,
}

impl HistoryWindow {
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Capacity for a terminal `cols` wide: two mirrored charts side by side.
    pub fn for_terminal_width(cols: u16) -> Self {
        Self::new((cols as usize / 2).saturating_sub(1))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn push(&mut self, sample: RateSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// One field's value from every retained sample, oldest first.
    pub fn values_for(&self, field: TrackedField) -> Vec<f64> {
        self.samples.iter().map(|s| s.get(field)).collect()
    }
}
