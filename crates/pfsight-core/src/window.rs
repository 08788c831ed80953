// Bounded FIFO of recent throughput samples.

use std::collections::VecDeque;

use crate::rate::RateSample;

/// Number of samples the dashboard chart shows.
pub const DEFAULT_CAPACITY: usize = 30;

/// Sliding window over the most recent [`RateSample`]s.
///
/// Oldest samples are evicted first once `capacity` is exceeded. Readers
/// get an owned snapshot; only the sampler mutates the window.
#[derive(Debug, Clone)]
pub struct ThroughputWindow {
    samples: VecDeque<RateSample>,
    capacity: usize,
}

impl Default for ThroughputWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ThroughputWindow {
    /// Create an empty window. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, sample: RateSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Samples oldest-first, detached from the window.
    pub fn snapshot(&self) -> Vec<RateSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&RateSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample(i: u32) -> RateSample {
        RateSample {
            label: format!("t{i}"),
            upload_kbs: f64::from(i),
            download_kbs: f64::from(i) * 2.0,
        }
    }

    #[test]
    fn keeps_last_thirty_of_thirty_five_in_order() {
        let mut window = ThroughputWindow::default();
        for i in 0..35 {
            window.push(sample(i));
        }

        let snap = window.snapshot();
        assert_eq!(snap.len(), 30);
        let labels: Vec<_> = snap.iter().map(|s| s.label.clone()).collect();
        let expected: Vec<_> = (5..35).map(|i| format!("t{i}")).collect();
        assert_eq!(labels, expected);
        assert_eq!(window.latest().map(|s| s.label.as_str()), Some("t34"));
    }

    #[test]
    fn snapshot_is_detached_from_later_pushes() {
        let mut window = ThroughputWindow::new(3);
        window.push(sample(1));
        let snap = window.snapshot();
        window.push(sample(2));
        assert_eq!(snap.len(), 1);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut window = ThroughputWindow::new(0);
        window.push(sample(1));
        window.push(sample(2));
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.snapshot(), vec![sample(2)]);
    }

    #[test]
    fn clear_empties_the_window() {
        let mut window = ThroughputWindow::new(5);
        window.push(sample(1));
        window.clear();
        assert!(window.is_empty());
    }
}
