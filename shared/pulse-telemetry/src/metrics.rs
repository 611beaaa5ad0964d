//! Metrics primitives

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter
#[derive(Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
    name: String,
}

impl Counter {
    pub fn new(name: &str) -> Self {
        Self {
            value: Arc::new(AtomicU64::new(0)),
            name: name.to_string(),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Point-in-time gauge, e.g. requests in flight
#[derive(Clone, Default)]
pub struct Gauge {
    value: Arc<AtomicU64>,
    name: String,
}

impl Gauge {
    pub fn new(name: &str) -> Self {
        Self {
            value: Arc::new(AtomicU64::new(0)),
            name: name.to_string(),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Saturates at zero.
    pub fn dec(&self) {
        let _ = self
            .value
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v.saturating_sub(1)));
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Sliding-window histogram keeping the most recent samples
#[derive(Clone)]
pub struct Histogram {
    samples: Arc<parking_lot::Mutex<VecDeque<f64>>>,
    name: String,
    max_samples: usize,
}

impl Histogram {
    pub fn new(name: &str) -> Self {
        Self::with_capacity(name, 10_000)
    }

    pub fn with_capacity(name: &str, max_samples: usize) -> Self {
        Self {
            samples: Arc::new(parking_lot::Mutex::new(VecDeque::with_capacity(
                max_samples.min(1000),
            ))),
            name: name.to_string(),
            max_samples: max_samples.max(1),
        }
    }

    pub fn record(&self, value: f64) {
        let mut samples = self.samples.lock();
        if samples.len() >= self.max_samples {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    pub fn count(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn percentile(&self, p: f64) -> f64 {
        let mut sorted: Vec<f64> = self.samples.lock().iter().copied().collect();
        if sorted.is_empty() {
            return 0.0;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        let idx = ((sorted.len() as f64) * p / 100.0) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    pub fn mean(&self) -> f64 {
        let samples = self.samples.lock();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = Counter::new("frames_decoded");
        assert_eq!(counter.get(), 0);
        counter.inc();
        assert_eq!(counter.get(), 1);
        counter.add(5);
        assert_eq!(counter.get(), 6);
        assert_eq!(counter.name(), "frames_decoded");
    }

    #[test]
    fn test_counter_clones_share_value() {
        let counter = Counter::new("requests_total");
        let handle = counter.clone();
        handle.inc();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_gauge() {
        let gauge = Gauge::new("requests_in_flight");
        gauge.inc();
        gauge.inc();
        assert_eq!(gauge.get(), 2);
        gauge.dec();
        assert_eq!(gauge.get(), 1);
        assert_eq!(gauge.name(), "requests_in_flight");
    }

    #[test]
    fn test_gauge_dec_saturates() {
        let gauge = Gauge::new("requests_in_flight");
        gauge.dec();
        assert_eq!(gauge.get(), 0);
    }

    #[test]
    fn test_histogram() {
        let hist = Histogram::new("request_latency_ms");
        hist.record(1.0);
        hist.record(2.0);
        hist.record(3.0);
        hist.record(4.0);
        hist.record(5.0);

        assert!((hist.mean() - 3.0).abs() < 0.001);
        assert!((hist.percentile(50.0) - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_histogram_window_drops_oldest() {
        let hist = Histogram::with_capacity("request_latency_ms", 2);
        hist.record(100.0);
        hist.record(1.0);
        hist.record(3.0);
        assert_eq!(hist.count(), 2);
        assert!((hist.mean() - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_histogram() {
        let hist = Histogram::new("request_latency_ms");
        assert_eq!(hist.mean(), 0.0);
        assert_eq!(hist.percentile(99.0), 0.0);
    }
}
