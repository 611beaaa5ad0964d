//! Request metrics for the Analysis Service

use pulse_core::PulseError;
use pulse_stream::AnalysisReport;
use pulse_telemetry::{Counter, Gauge, Histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::info;

pub struct ServiceMetrics {
    pub requests_total: Counter,
    pub requests_failed: Counter,
    pub requests_in_flight: Gauge,
    pub frames_decoded: Counter,
    pub frames_skipped: Counter,
    pub request_latency_ms: Histogram,
    feed_reachable: AtomicBool,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            requests_total: Counter::new("analysis_requests_total"),
            requests_failed: Counter::new("analysis_requests_failed"),
            requests_in_flight: Gauge::new("analysis_requests_in_flight"),
            frames_decoded: Counter::new("analysis_frames_decoded"),
            frames_skipped: Counter::new("analysis_frames_skipped"),
            request_latency_ms: Histogram::new("analysis_request_latency_ms"),
            feed_reachable: AtomicBool::new(true),
        }
    }

    /// Count a request until the returned guard drops.
    pub fn start_request(&self) -> InFlight<'_> {
        self.requests_total.inc();
        self.requests_in_flight.inc();
        InFlight {
            metrics: self,
            started: Instant::now(),
        }
    }

    pub fn record_success(&self, report: &AnalysisReport) {
        self.frames_decoded.add(report.summary.total_posts);
        self.frames_skipped.add(report.skipped_frames);
        if report.feed_opened {
            self.feed_reachable.store(true, Ordering::Relaxed);
        }
    }

    pub fn record_failure(&self, error: &PulseError) {
        self.requests_failed.inc();
        if matches!(error, PulseError::StreamUnavailable(_)) {
            self.feed_reachable.store(false, Ordering::Relaxed);
        }
    }

    /// False once the most recent feed attempt failed to connect or read.
    pub fn feed_reachable(&self) -> bool {
        self.feed_reachable.load(Ordering::Relaxed)
    }

    pub fn log_totals(&self) {
        for counter in [
            &self.requests_total,
            &self.requests_failed,
            &self.frames_decoded,
            &self.frames_skipped,
        ] {
            info!(metric = counter.name(), value = counter.get(), "Final count");
        }

        let in_flight = &self.requests_in_flight;
        info!(metric = in_flight.name(), value = in_flight.get(), "Final gauge");

        let latency = &self.request_latency_ms;
        info!(
            metric = latency.name(),
            samples = latency.count(),
            mean = latency.mean(),
            p99 = latency.percentile(99.0),
            "Final latency"
        );
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Records latency and leaves the in-flight gauge on drop, including when a
/// client hangs up.
pub struct InFlight<'a> {
    metrics: &'a ServiceMetrics,
    started: Instant,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let metrics = self.metrics;
        metrics
            .request_latency_ms
            .record(self.started.elapsed().as_secs_f64() * 1000.0);
        metrics.requests_in_flight.dec();
    }
}
